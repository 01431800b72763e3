//! Reel HTTP Client
//!
//! Client for the asynchronous job API that turns a source video URL into a
//! downloadable file.
//!
//! The workflow has three stages, each awaited to completion before the
//! next starts:
//! - submit a job and receive its ID
//! - poll the job until it is terminal
//! - stream the job's output file to disk
//!
//! # Example
//!
//! ```no_run
//! use reel_client::{ClientConfig, PollOptions, SieveClient};
//! use reel_core::dto::job::JobOptions;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SieveClient::new(ClientConfig::from_env()?)?;
//!
//!     let outcome = client
//!         .run(
//!             "https://www.youtube.com/watch?v=1aA1WGON49E",
//!             "downloaded_video.mp4",
//!             &JobOptions::default(),
//!             &PollOptions::default(),
//!             &CancellationToken::new(),
//!         )
//!         .await?;
//!
//!     println!("Saved {} bytes to {}", outcome.bytes, outcome.path.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod fetch;
mod jobs;
pub mod retry;
mod workflow;

// Re-export commonly used types
pub use config::{ClientConfig, PollOptions};
pub use error::{ClientError, Result};
pub use fetch::CHUNK_SIZE;
pub use retry::RetryPolicy;
pub use workflow::RunOutcome;

use std::future::Future;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::API_KEY_HEADER;

/// HTTP client for the job API
///
/// Methods are organized into groups:
/// - Job submission and status (`submit`, `get_job`, `poll_until_terminal`)
/// - File download (`fetch_to_file`)
/// - The full workflow (`run`)
#[derive(Debug, Clone)]
pub struct SieveClient {
    config: ClientConfig,
    /// HTTP client instance
    client: Client,
}

impl SieveClient {
    /// Create a new client
    ///
    /// The configuration is validated first.
    ///
    /// # Example
    /// ```
    /// use reel_client::{ClientConfig, SieveClient};
    ///
    /// let client = SieveClient::new(ClientConfig::new("my-api-key")).unwrap();
    /// assert_eq!(client.base_url(), "https://mango.sievedata.com/v2");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Self::with_client(config, client)
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(mut config: ClientConfig, client: Client) -> Result<Self> {
        config.validate()?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self { config, client })
    }

    /// Get the base URL of the job API
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Build an authenticated request against the job API
    ///
    /// Fails with [`ClientError::InvalidConfig`] when no API key is set, so
    /// nothing is sent.
    fn api_request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ClientError::InvalidConfig("an API key is required for job requests".to_string())
        })?;

        let builder = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, api_key);

        Ok(match self.config.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        })
    }
}

/// Read an error response body for diagnostics
async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}

/// Deserialize a successful JSON response
async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Race a future against the cancellation token
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = fut => result,
    }
}
