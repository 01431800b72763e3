//! Job domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Job record as returned by the status endpoint
///
/// `status` and `outputs` are a typed view over the body. The body itself is
/// kept as received and is what the record serializes back to, so a record
/// can be shown exactly as the API sent it. A `null` or mistyped `status`
/// reads as unknown, and a `null` or missing `outputs` reads as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub status: JobStatus,
    pub outputs: Vec<OutputDescriptor>,
    raw: Map<String, Value>,
}

impl JobRecord {
    /// Build a record from a status response body
    pub fn from_body(raw: Map<String, Value>) -> Self {
        let status = match raw.get("status") {
            Some(Value::String(s)) => JobStatus::from(s.clone()),
            _ => JobStatus::default(),
        };

        // Malformed entries keep their slot so the first output stays first
        let outputs = match raw.get("outputs") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            status,
            outputs,
            raw,
        }
    }

    /// The body as received
    pub fn body(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// URL of the primary result artifact
    ///
    /// Only the first output is considered. Returns `None` when there are no
    /// outputs or the first one carries no (or an empty) URL.
    pub fn primary_output_url(&self) -> Option<&str> {
        self.outputs
            .first()
            .and_then(|output| output.url())
            .filter(|url| !url.is_empty())
    }

    /// Job ID echoed back by the API, if present
    pub fn id(&self) -> Option<&str> {
        self.raw.get("id").and_then(Value::as_str)
    }

    /// Error message attached to a failed job, if present
    pub fn error_message(&self) -> Option<&str> {
        self.raw.get("error").and_then(Value::as_str)
    }
}

impl Serialize for JobRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JobRecord {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_body)
    }
}

/// Job execution status
///
/// Only `finished`, `failed` and `error` are terminal. Anything the API
/// sends that is not recognised is kept verbatim in `Other` and treated
/// as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Running,
    Finished,
    Failed,
    Error,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::Other(s) => s,
        }
    }

    /// Whether no further transition can occur
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Finished)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Error)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Other(String::new())
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "running" => JobStatus::Running,
            "finished" => JobStatus::Finished,
            "failed" => JobStatus::Failed,
            "error" => JobStatus::Error,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Other(s) if s.is_empty() => write!(f, "<unknown>"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// One result artifact of a finished job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    #[serde(default)]
    pub data: Option<OutputData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OutputDescriptor {
    pub fn url(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.url.as_deref())
    }
}

/// Payload of an output descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
