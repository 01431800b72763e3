//! Bounded exponential backoff for idempotent calls
//!
//! Only transport failures are retried (see [`ClientError::is_retryable`]).
//! Job submission never goes through here: the push endpoint takes no
//! idempotency key, so a resend could create a duplicate job.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{ClientError, Result};

/// Retry policy with exponential backoff and a delay cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that sends each request exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts
pub(crate) async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    what: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    what, attempt, max_attempts, e, delay
                );

                tokio::select! {
                    _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(3),
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(4), Duration::from_secs(3));
        assert_eq!(policy.delay_for(40), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_non_retryable_error_is_returned_immediately() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<()> = with_retry(&RetryPolicy::default(), &cancel, "status", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ClientError::Poll {
                    status: 500,
                    body: "boom".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ClientError::Poll { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// A genuine transport failure: nothing listens on the discard port
    async fn refused() -> ClientError {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .unwrap_err();
        ClientError::from(err)
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_retried_until_success() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let value = with_retry(&fast_policy(3), &cancel, "status", || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call == 1 {
                    Err(refused().await)
                } else {
                    Ok(call)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_stops_at_max_attempts() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<()> = with_retry(&fast_policy(3), &cancel, "status", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(refused().await) }
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
        assert!(err.is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_during_backoff() {
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_secs(60),
            max_delay: Duration::from_secs(60),
        };

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let result: Result<()> = with_retry(&policy, &cancel, "status", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(refused().await) }
        })
        .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_is_returned() {
        let cancel = CancellationToken::new();
        let value = with_retry(&RetryPolicy::none(), &cancel, "status", || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
