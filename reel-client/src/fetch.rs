//! Output file download

use std::path::{Path, PathBuf};

use futures_util::{Stream, StreamExt};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::retry::with_retry;
use crate::{SieveClient, cancellable};

/// Size of the buffered writes to the destination file
pub const CHUNK_SIZE: usize = 8192;

impl SieveClient {
    /// Stream `url` into `destination`
    ///
    /// The body is written to a hidden temp file next to `destination` and
    /// renamed into place only once the whole stream has been written and
    /// synced. On any failure the temp file is removed and `destination` is
    /// left untouched. Output URLs are public, so no API key is sent.
    ///
    /// # Returns
    /// The number of bytes written
    pub async fn fetch_to_file(
        &self,
        url: &str,
        destination: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let destination = destination.as_ref();
        let file_name = destination.file_name().ok_or_else(|| {
            ClientError::InvalidRequest(format!(
                "destination {} has no file name",
                destination.display()
            ))
        })?;

        let response = with_retry(&self.config.retry, cancel, "Download request", || {
            cancellable(cancel, async {
                self.client.get(url).send().await.map_err(ClientError::from)
            })
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;

        let temp_path = parent.join(format!(
            ".{}.{}.part",
            file_name.to_string_lossy(),
            Uuid::new_v4().simple()
        ));
        let guard = TempFileGuard::new(temp_path.clone());

        debug!("Streaming {} into {}", url, temp_path.display());

        let file = fs::File::create(&temp_path).await?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);

        let written = cancellable(cancel, write_chunks(response.bytes_stream(), &mut writer)).await?;

        writer.flush().await?;
        let file = writer.into_inner();
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, destination).await?;
        guard.disarm();

        info!("Saved {} bytes to {}", written, destination.display());
        Ok(written)
    }
}

/// Write every non-empty chunk of `stream` to `writer`, in order
///
/// # Returns
/// The total number of bytes written
pub(crate) async fn write_chunks<S, B, E, W>(stream: S, writer: &mut W) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<ClientError>,
    W: AsyncWrite + Unpin,
{
    let mut stream = std::pin::pin!(stream);
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        let bytes = chunk.as_ref();

        // Keep-alive chunks carry no data
        if bytes.is_empty() {
            continue;
        }

        writer.write_all(bytes).await?;
        written += bytes.len() as u64;
    }

    Ok(written)
}

/// Removes a temp file when dropped, unless disarmed
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed partial download {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove partial download {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
