//! Retry with exponential backoff for content queries.
//!
//! Retries timeouts, connection failures, 5xx, 408 and 429. Everything else
//! (other 4xx, malformed bodies) fails on the first attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::ContentError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Backoff before retry number `attempt + 1`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Classify an HTTP status.
pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out.
///
/// Returns the last error when every attempt failed.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, operation: F) -> Result<T, ContentError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ContentError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!("Content query succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => {
                tracing::debug!("Non-retryable content error: {}", e);
                return Err(e);
            }
            Err(e) if attempt >= config.max_retries => {
                tracing::error!(
                    "All {} content query attempts failed: {}",
                    config.max_retries + 1,
                    e
                );
                return Err(e);
            }
            Err(e) => {
                let delay = config.delay_for_attempt(attempt);
                attempt += 1;
                tracing::warn!(
                    "Retryable content error ({}); retry {} of {} in {:?}",
                    e,
                    attempt,
                    config.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
