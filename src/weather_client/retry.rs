//! Retry with exponential backoff for requests to the forecast provider.
//!
//! Retried: timeouts, connection errors, interrupted bodies, 5xx, 408 and 429.
//! Not retried: other 4xx responses and request construction errors.

use crate::weather_client::error::WeatherClientError;
use log::{debug, error, info, warn};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

/// Retry budget and backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub initial_delay: Duration,
    /// Upper bound for a single delay.
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

    /// No retries; the first failure is terminal.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Delay before retry number `attempt + 1`: `initial_delay * 2^attempt`, capped.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryDecision {
    Retry,
    NoRetry,
}

pub(crate) fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_builder() {
        return RetryDecision::NoRetry;
    }
    // Connection resets surface as request errors.
    if error.is_timeout() || error.is_connect() || error.is_request() {
        return RetryDecision::Retry;
    }
    // A body cut off mid-transfer.
    if error.is_body() || error.is_decode() {
        return RetryDecision::Retry;
    }
    match error.status() {
        Some(status) => is_retryable_status(status),
        None => RetryDecision::NoRetry,
    }
}

pub(crate) fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Runs `operation` until it yields a non-retryable outcome or the budget in
/// `config` is spent.
///
/// `operation` sends the request and reads the whole body, so a transfer that
/// breaks off halfway is retried like a failed connection. A non-retryable
/// status (success or 4xx) is returned with its body; the caller decides what
/// to do with it. Exhausting the budget yields
/// [`WeatherClientError::ProviderUnavailable`].
pub(crate) async fn send_with_retry<F, Fut>(
    config: &RetryConfig,
    url: &str,
    operation: F,
) -> Result<(StatusCode, String), WeatherClientError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(StatusCode, String), reqwest::Error>>,
{
    let attempts = config.max_retries + 1;
    let mut last_reason = String::from("no attempt made");
    let mut last_error: Option<reqwest::Error> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt - 1);
            info!(
                "Retry {} of {} for {}, waiting {:?}",
                attempt, config.max_retries, url, delay
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok((status, body)) => {
                if is_retryable_status(status) == RetryDecision::Retry {
                    warn!(
                        "Provider returned retryable status {} (attempt {} of {})",
                        status,
                        attempt + 1,
                        attempts
                    );
                    last_reason = format!("status {}", status);
                    last_error = None;
                    continue;
                }
                if attempt > 0 {
                    info!("Request to {} succeeded after {} retries", url, attempt);
                }
                return Ok((status, body));
            }
            Err(e) => {
                if is_retryable_error(&e) == RetryDecision::NoRetry {
                    debug!("Non-retryable error for {}: {}", url, e);
                    return Err(WeatherClientError::NetworkRequest(url.to_string(), e));
                }
                warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    attempts,
                    e
                );
                last_reason = e.to_string();
                last_error = Some(e);
            }
        }
    }

    error!("All {} attempts for {} exhausted", attempts, url);
    Err(WeatherClientError::ProviderUnavailable {
        url: url.to_string(),
        attempts,
        reason: last_reason,
        source: last_error,
    })
}
