//! Resilient call layer: bounded retry with linear backoff.
//!
//! Applied to mutating operations only. Read fetchers bypass this layer on
//! purpose: a failed read should fail fast and leave the prior view intact
//! rather than stall the console for several seconds.

use std::{future::Future, time::Duration};

use tracing::warn;

use super::error::ApiError;

/// Retry bounds for a mutating call.
///
/// A call is attempted `max_retries + 1` times in total. Before retry `n`
/// (1-based) the caller waits `n × base_delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Run `op` until it succeeds or the policy's attempts are exhausted.
///
/// Every failure short of exhaustion is logged and retried; only the final
/// failure surfaces to the caller.
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                attempt += 1;
                if attempt > policy.max_retries {
                    return Err(error);
                }
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    error = %error,
                    "Mutating call failed, retrying"
                );
                tokio::time::sleep(policy.base_delay * attempt).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(0),
        }
    }

    #[tokio::test]
    async fn failing_call_is_attempted_exactly_max_retries_plus_one_times() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), ApiError> = call_with_retry(&fast_policy(2), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::status("/api/cache/flush", 502)) }
        })
        .await;

        assert!(matches!(
            result,
            Err(ApiError::Status { status: 502, .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn success_on_a_later_attempt_stops_retrying() {
        let attempts = AtomicU32::new(0);

        let result = call_with_retry(&fast_policy(2), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(ApiError::status("/api/cache/flush", 503))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.expect("second attempt succeeds"), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_max_retries_means_a_single_attempt() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), ApiError> = call_with_retry(&fast_policy(0), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::rejected("nope")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
