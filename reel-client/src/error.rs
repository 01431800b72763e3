//! Error types for the Reel client

use std::time::Duration;

use reel_core::domain::job::JobRecord;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while submitting, polling or fetching a job
#[derive(Debug, Error)]
pub enum ClientError {
    /// The push endpoint rejected the job
    #[error("Failed to submit job (status {status}): {body}")]
    Submission {
        /// HTTP status code
        status: u16,
        /// Response body returned by the API
        body: String,
    },

    /// The status endpoint returned an error status
    #[error("Failed to poll job (status {status}): {body}")]
    Poll { status: u16, body: String },

    /// The job reached a failure state
    #[error("Job {job_id} did not complete successfully (status {})", .record.status)]
    JobFailed {
        job_id: String,
        /// Full record from the last poll, kept for diagnostics
        record: Box<JobRecord>,
    },

    /// The output file could not be downloaded
    #[error("Failed to fetch {url} (status {status})")]
    Fetch { status: u16, url: String },

    /// A finished job had no usable output URL
    #[error("Job {job_id} finished without an output URL")]
    NoOutput { job_id: String },

    /// The job did not reach a terminal state within the wait budget
    #[error("Job {job_id} still not terminal after {waited:?}")]
    Timeout { job_id: String, waited: Duration },

    /// The operation was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Submission { status, .. } | Self::Poll { status, .. } | Self::Fetch { status, .. } => {
                Some(*status)
            }
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Whether the failing call may succeed if sent again
    ///
    /// Only transport failures qualify. An HTTP error status means the API
    /// answered and is reported as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}
