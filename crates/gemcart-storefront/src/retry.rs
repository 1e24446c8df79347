//! Retry with exponential back-off and jitter for Storefront API calls.
//!
//! Cart mutations are not idempotent: a timed-out `cartLinesAdd` may already
//! have been applied, and sending it again would double the quantity. Callers
//! therefore declare whether an operation is a [`Replay::Safe`] read or a
//! [`Replay::RejectedOnly`] mutation, which is only replayed when the server
//! provably never processed it (HTTP 429, connection refused).

use std::future::Future;
use std::time::Duration;

use crate::error::StorefrontError;

/// Which failures an operation may be replayed after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replay {
    /// Queries: any transient failure is safe to replay.
    Safe,
    /// Mutations: replay only when the request never reached the handler.
    RejectedOnly,
}

/// Returns `true` if `err` is worth retrying under `replay`.
///
/// - [`StorefrontError::RateLimited`]: always; the request was rejected.
/// - [`StorefrontError::Http`] connect failures: always; nothing was sent.
/// - [`StorefrontError::Http`] timeouts and 5xx: reads only.
/// - Everything else (GraphQL errors, bad JSON, 4xx): never.
pub(crate) fn is_retriable(err: &StorefrontError, replay: Replay) -> bool {
    match err {
        StorefrontError::RateLimited { .. } => true,
        StorefrontError::Http(e) if e.is_connect() => true,
        StorefrontError::Http(e) => {
            replay == Replay::Safe
                && (e.is_timeout() || e.status().is_some_and(|s| s.is_server_error()))
        }
        StorefrontError::UnexpectedStatus { status, .. } => {
            replay == Replay::Safe && (500..600).contains(status)
        }
        _ => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// retriable errors.
///
/// Back-off is `backoff_base_ms × 2^(attempt-1)` with ±25 % jitter, capped
/// at 10 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    replay: Replay,
    mut operation: F,
) -> Result<T, StorefrontError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorefrontError>>,
{
    const MAX_DELAY_MS: u64 = 10_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err, replay) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "storefront transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
