//! Bounded retry with exponential backoff for calls to external services.
//!
//! Every attempt is time-bounded by [`RetryPolicy::call_timeout`]; only
//! errors of kind [`ErrorKind::Transient`](crate::error::ErrorKind) are
//! retried.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::DuelError;

/// Default number of attempts per call, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
/// Default ceiling for a single backoff delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
/// Default symmetric jitter applied to each delay.
pub const DEFAULT_JITTER_FACTOR: f64 = 0.2;
/// Default time bound for one attempt.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry and timeout parameters for external calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per call, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Ceiling for a single delay.
    pub max_delay: Duration,
    /// Jitter factor in `[0, 1]`; 0.2 varies delays by ±20%.
    pub jitter_factor: f64,
    /// Time bound for one attempt.
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            jitter_factor: DEFAULT_JITTER_FACTOR,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    ///
    /// `min(max_delay, base_delay * 2^retry)` scaled by `1 ± jitter_factor`,
    /// where `random` in `[0, 1)` picks the point inside the jitter range.
    #[must_use]
    pub fn backoff_delay(&self, retry: u32, random: f64) -> Duration {
        let exponential = self.base_delay.saturating_mul(1u32 << retry.min(16));
        let capped = exponential.min(self.max_delay);
        let jitter = 1.0 + (random.clamp(0.0, 1.0) * 2.0 - 1.0) * self.jitter_factor;
        capped.mul_f64(jitter.max(0.0))
    }
}

/// Runs `call` exactly once under the policy's time bound.
///
/// For calls that must not be repeated within a pass, such as publishing.
///
/// # Errors
///
/// Returns the call's error, or [`DuelError::Timeout`] if it did not finish
/// within [`RetryPolicy::call_timeout`].
pub async fn call_once<T, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    call: Fut,
) -> Result<T, DuelError>
where
    Fut: Future<Output = Result<T, DuelError>>,
{
    tokio::time::timeout(policy.call_timeout, call)
        .await
        .unwrap_or(Err(DuelError::Timeout {
            operation,
            after: policy.call_timeout,
        }))
}

/// Runs `call` until it succeeds, fails with a non-transient error, or the
/// policy's attempts are exhausted. The last error is returned on failure.
///
/// # Errors
///
/// Returns the error of the final attempt; a timed-out attempt surfaces as
/// [`DuelError::Timeout`].
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut call: F,
) -> Result<T, DuelError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DuelError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = match tokio::time::timeout(policy.call_timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(DuelError::Timeout {
                operation,
                after: policy.call_timeout,
            }),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < attempts => {
                let delay = policy.backoff_delay(attempt - 1, rand::random::<f64>());
                warn!(
                    operation,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
