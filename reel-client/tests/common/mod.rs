//! Shared helpers for the client integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reel_client::{ClientConfig, PollOptions, RetryPolicy, SieveClient};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Client pointed at the mock server, without transport retries
pub fn client_for(server: &MockServer) -> SieveClient {
    let config = ClientConfig::new(API_KEY)
        .with_base_url(server.uri())
        .with_retry(RetryPolicy::none());
    SieveClient::new(config).expect("valid test config")
}

/// Poll options fast enough for tests
pub fn fast_poll() -> PollOptions {
    PollOptions::new(Duration::from_millis(10)).with_max_wait(Some(Duration::from_secs(5)))
}

/// Responds with each template in turn, repeating the last one
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    next: AtomicUsize,
}

impl Sequence {
    pub fn json(bodies: Vec<Value>) -> Self {
        Self {
            responses: bodies
                .into_iter()
                .map(|body| ResponseTemplate::new(200).set_body_json(body))
                .collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let index = index.min(self.responses.len() - 1);
        self.responses[index].clone()
    }
}

/// Number of requests the server received on `path`
pub async fn requests_to(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == path)
        .count()
}

/// One step of a hand-written HTTP response
pub enum Step {
    /// Write these bytes and flush them
    Send(Vec<u8>),
    Pause(Duration),
    /// Keep the connection open until the client goes away
    Hold,
}

impl Step {
    pub fn send(bytes: impl AsRef<[u8]>) -> Self {
        Step::Send(bytes.as_ref().to_vec())
    }
}

/// Serve a single connection by playing `steps` after the request head
///
/// The socket is closed once the steps run out, which lets tests cut a body
/// short or pace its chunks. Returns the URL to fetch.
pub async fn serve_raw(steps: Vec<Step>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|window| window == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }

        for step in steps {
            match step {
                Step::Send(bytes) => {
                    if socket.write_all(&bytes).await.is_err() || socket.flush().await.is_err() {
                        return;
                    }
                }
                Step::Pause(delay) => tokio::time::sleep(delay).await,
                Step::Hold => {
                    while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
                    return;
                }
            }
        }
    });

    format!("http://{}/file", addr)
}

/// Names of the temp download files left in `dir`
pub fn leftover_parts(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".part"))
        .collect()
}
