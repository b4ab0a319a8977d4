//! Exponential backoff for remote calls

use std::future::Future;

use bookgraph_config::RetryConfig;
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` is exhausted
///
/// The delay before attempt `n + 1` is `base_delay_ms * multiplier^(n - 1)`,
/// capped at `max_delay_ms`. A policy with zero attempts still runs once.
pub async fn retry_with_backoff<F, Fut, T>(
    policy: &RetryConfig,
    label: &str,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!("{}: attempt {} of {}", label, attempt, max_attempts);

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{}: succeeded on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(error) => {
                if !error.is_retryable() {
                    warn!("{}: error is not retryable, giving up: {}", label, error);
                    return Err(error);
                }
                if attempt >= max_attempts {
                    warn!("{}: all {} attempts failed: {}", label, max_attempts, error);
                    return Err(error);
                }

                let delay = policy.delay_after(attempt);
                warn!(
                    "{}: attempt {} failed ({}), retrying in {:?}",
                    label, attempt, error, delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
