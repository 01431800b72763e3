//! End-to-end workflow: submit, wait, download

use std::path::{Path, PathBuf};

use reel_core::dto::job::JobOptions;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::SieveClient;
use crate::config::PollOptions;
use crate::error::{ClientError, Result};

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub job_id: String,
    /// URL the output file was downloaded from
    pub output_url: String,
    pub path: PathBuf,
    pub bytes: u64,
}

impl SieveClient {
    /// Submit a job, wait for it, and download its primary output
    ///
    /// Only the first output of the finished job is downloaded. Errors from
    /// each stage are returned unchanged; nothing is retried at this level.
    pub async fn run(
        &self,
        source_url: &str,
        destination: impl AsRef<Path>,
        options: &JobOptions,
        poll: &PollOptions,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome> {
        let destination = destination.as_ref();

        let job_id = self.submit(source_url, options, cancel).await?;
        let record = self.poll_until_terminal(&job_id, poll, cancel).await?;

        let output_url = record
            .primary_output_url()
            .ok_or_else(|| ClientError::NoOutput {
                job_id: job_id.clone(),
            })?
            .to_string();

        if record.outputs.len() > 1 {
            info!(
                "Job {} produced {} outputs, downloading the first",
                job_id,
                record.outputs.len()
            );
        }

        let bytes = self.fetch_to_file(&output_url, destination, cancel).await?;

        Ok(RunOutcome {
            job_id,
            output_url,
            path: destination.to_path_buf(),
            bytes,
        })
    }
}
