//! Job submission and status endpoints

use reel_core::domain::job::JobRecord;
use reel_core::dto::job::{JobOptions, JobRequest, PushResponse};
use reqwest::Method;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PollOptions;
use crate::error::{ClientError, Result};
use crate::retry::with_retry;
use crate::{SieveClient, cancellable, error_body, parse_json};

impl SieveClient {
    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a download job for `source_url`
    ///
    /// The source URL is not validated locally; a malformed one is reported
    /// by the API as a [`ClientError::Submission`]. The request is sent
    /// exactly once and abandoned with [`ClientError::Cancelled`] if `cancel`
    /// fires first.
    ///
    /// # Returns
    /// The non-empty job ID assigned by the API
    pub async fn submit(
        &self,
        source_url: &str,
        options: &JobOptions,
        cancel: &CancellationToken,
    ) -> Result<String> {
        options.validate().map_err(ClientError::InvalidRequest)?;

        let url = format!("{}/push", self.base_url());
        let request = JobRequest::new(source_url, options);

        debug!("Pushing job for {} ({} {})", source_url, options.resolution, options.video_format);

        let push: PushResponse = cancellable(cancel, async {
            let response = self
                .api_request(Method::POST, &url)?
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::Submission {
                    status: status.as_u16(),
                    body: error_body(response).await,
                });
            }

            parse_json(response).await
        })
        .await?;

        let job_id = push
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::ParseError("push response carried no job id".to_string()))?;

        info!("Pushed job {}", job_id);
        Ok(job_id)
    }

    // =============================================================================
    // Job Status
    // =============================================================================

    /// Get the current record of a job
    pub async fn get_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        if job_id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "job id cannot be empty".to_string(),
            ));
        }

        self.fetch_status(job_id, cancel).await
    }

    /// Poll a job until it reaches a terminal state
    ///
    /// Sleeps `options.interval` between requests. Gives up with
    /// [`ClientError::Timeout`] once `options.max_wait` has elapsed, and with
    /// [`ClientError::Cancelled`] as soon as `cancel` fires.
    ///
    /// # Returns
    /// The record of the first `finished` response, unchanged
    pub async fn poll_until_terminal(
        &self,
        job_id: &str,
        options: &PollOptions,
        cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        if job_id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "job id cannot be empty".to_string(),
            ));
        }

        let started = Instant::now();
        let deadline = options.max_wait.map(|budget| started + budget);
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            attempts += 1;
            let record = self.fetch_status(job_id, cancel).await?;
            info!("Job {} status: {}", job_id, record.status);

            if record.status.is_success() {
                debug!("Job {} finished after {} status request(s)", job_id, attempts);
                return Ok(record);
            }

            if record.status.is_failure() {
                return Err(ClientError::JobFailed {
                    job_id: job_id.to_string(),
                    record: Box::new(record),
                });
            }

            let delay = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(ClientError::Timeout {
                            job_id: job_id.to_string(),
                            waited: started.elapsed(),
                        });
                    }
                    options.interval.min(deadline - now)
                }
                None => options.interval,
            };

            sleep_or_cancel(delay, cancel).await?;
        }
    }

    /// One status request, retrying transport failures only
    async fn fetch_status(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        let url = format!("{}/jobs/{}", self.base_url(), job_id);

        with_retry(&self.config.retry, cancel, "Status request", || {
            cancellable(cancel, async {
                let response = self.api_request(Method::GET, &url)?.send().await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ClientError::Poll {
                        status: status.as_u16(),
                        body: error_body(response).await,
                    });
                }

                parse_json(response).await
            })
        })
        .await
    }
}

async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
