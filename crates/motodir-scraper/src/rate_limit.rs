//! Retry with exponential backoff for the geodata service.
//!
//! The public Overpass instances answer 429 when a client queries too often
//! and 504 when the server is overloaded. Both are transient and worth a
//! delayed retry. Parse failures and other 4xx answers are returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_SECS: u64 = 120;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
/// - [`ScraperError::Http`]: timeouts and connection failures.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        ScraperError::Deserialize { .. } | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds scaled by a random factor in `[0.75, 1.25)`, capped at
/// [`MAX_DELAY_SECS`]. A 429 carrying a longer `Retry-After` waits at least
/// that long (still capped).
///
/// With `max_retries = 2` the operation is attempted at most 3 times total.
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
        attempt += 1;

        let computed = backoff_base_secs.saturating_mul(1u64 << (attempt - 1).min(20));
        let floor = match &err {
            ScraperError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => 0,
        };
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let jittered_ms = (computed as f64 * 1000.0 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        let delay_ms = jittered_ms
            .max(floor.saturating_mul(1000))
            .min(MAX_DELAY_SECS * 1000);

        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient geodata error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
