//! # Retry Policy
//!
//! Caller-side retries with bounded exponential backoff. Gateways never retry
//! on their own; a host opts in by wrapping its call in [`RetryPolicy::run`].

use crate::error::PaymentResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (minimum 1)
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    pub fn exponential(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.initial_backoff.saturating_mul(1u32 << exponent);
        delay.min(self.max_backoff)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. The last error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> PaymentResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PaymentResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Payment attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let policy = RetryPolicy::exponential(5, Duration::from_millis(100), Duration::from_millis(350));

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(40), Duration::from_millis(350));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::exponential(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_unavailable_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::exponential(3, Duration::from_secs(1), Duration::from_secs(5));

        let result = policy
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(PaymentError::unavailable("abmex", "HTTP 503"))
                } else {
                    Ok("https://pay.example.com/ok")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "https://pay.example.com/ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::exponential(2, Duration::from_secs(1), Duration::from_secs(5));

        let result: PaymentResult<()> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(PaymentError::unavailable("abmex", "timeout"))
            })
            .await;

        assert!(matches!(result, Err(PaymentError::ProviderUnavailable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::exponential(5, Duration::from_secs(1), Duration::from_secs(5));

        let result: PaymentResult<()> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(PaymentError::CredentialsRejected {
                    provider: "abmex".into(),
                    status: 401,
                })
            })
            .await;

        assert!(matches!(result, Err(PaymentError::CredentialsRejected { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
