//! Optional retry with exponential backoff for page fetches.
//!
//! Runs default to zero retries: a failed page ends the run and the next
//! scheduled run is the retry. Operators can raise `SHELFWATCH_MAX_RETRIES`
//! to retry transient failures inside a run.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is a transient condition worth retrying.
///
/// Retriable: network failures ([`ScraperError::Http`]), HTTP 429, and 5xx.
/// Everything else (4xx, bad URL, extraction failures) is returned as-is.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
