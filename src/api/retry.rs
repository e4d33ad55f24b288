// Retry logic with exponential backoff
//
// Only errors that say so via `ApiError::is_retryable` are retried, and only
// for requests that are safe to repeat.

use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::errors::ApiError;

/// Execute a request with exponential backoff.
pub async fn with_retry<F, Fut, T>(policy: &RetryConfig, f: F) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < attempts => {
                let delay = backoff(policy.base_delay_ms, attempt);
                tracing::warn!(
                    "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                    attempt,
                    attempts,
                    e,
                    delay
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn backoff(base_delay_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_delay_ms.saturating_mul(factor))
}
