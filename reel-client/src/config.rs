//! Client configuration
//!
//! Credentials, endpoint location and network tuning for the job API.
//! Everything the client sends is taken from here; nothing is hardcoded
//! at the call sites.

use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::retry::RetryPolicy;

/// Default base URL of the job API
pub const DEFAULT_BASE_URL: &str = "https://mango.sievedata.com/v2";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Static API key sent with every API call
    ///
    /// Only the job endpoints need it. A client without one can still
    /// download output files.
    pub api_key: Option<String>,

    /// Base URL of the job API (e.g., "https://mango.sievedata.com/v2")
    pub base_url: String,

    /// Per-request timeout, `None` for no timeout
    pub request_timeout: Option<Duration>,

    /// Retry policy for idempotent GET calls
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::without_key()
        }
    }

    /// Creates a configuration with no API key, enough for downloads
    pub fn without_key() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(60)),
            retry: RetryPolicy::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SIEVE_API_KEY (optional, required by the job endpoints)
    /// - SIEVE_API_URL (optional, default: https://mango.sievedata.com/v2)
    /// - SIEVE_REQUEST_TIMEOUT (optional, seconds, default: 60)
    /// - SIEVE_MAX_RETRIES (optional, default: 3)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::without_key();
        config.api_key = std::env::var("SIEVE_API_KEY").ok();

        if let Ok(url) = std::env::var("SIEVE_API_URL") {
            config.base_url = url;
        }

        if let Some(secs) = std::env::var("SIEVE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(attempts) = std::env::var("SIEVE_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            config.retry.max_attempts = attempts;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
            return Err(ClientError::InvalidConfig(
                "api_key cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ClientError::InvalidConfig(
                "retry.max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// The key never ends up in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Fixed delay between status requests
    pub interval: Duration,

    /// Total wait budget, `None` to wait indefinitely
    pub max_wait: Option<Duration>,
}

impl PollOptions {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_wait: Some(Duration::from_secs(30 * 60)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::new("key");

        config.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.api_key = Some("key".to_string());
        config.base_url = "mango.sievedata.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:9000".to_string();
        assert!(config.validate().is_ok());

        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_without_key_is_valid() {
        let config = ClientConfig::without_key();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_default_poll_options() {
        let options = PollOptions::default();
        assert_eq!(options.interval, Duration::from_secs(5));
        assert_eq!(options.max_wait, Some(Duration::from_secs(1800)));

        let unbounded = PollOptions::new(Duration::from_secs(1)).with_max_wait(None);
        assert_eq!(unbounded.interval, Duration::from_secs(1));
        assert!(unbounded.max_wait.is_none());
    }
}
