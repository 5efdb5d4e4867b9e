//! Retry with exponential back-off and jitter for transient database faults.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors. Non-transient errors (bad configuration, decode
//! failures, schema contract mismatches) are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::DbError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - I/O and TLS failures: the server is unreachable or still starting.
/// - Protocol errors and pool timeouts: connection-level transients.
/// - Server-side errors: a database container that is up but still
///   initializing can reject handshakes with server errors.
///
/// **Not retriable (hard stop):**
/// - Configuration errors: a bad option will not fix itself.
/// - Decode/type errors: retrying returns the same rows.
/// - [`DbError::AttributeDictionary`]: the schema contract is wrong.
pub(crate) fn is_retriable(err: &DbError) -> bool {
    match err {
        DbError::Sqlx(e) => matches!(
            e,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::Protocol(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::Database(_)
        ),
        DbError::Unavailable { .. } | DbError::AttributeDictionary(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 2_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 2 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 2 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 2 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 60 s. Non-retriable errors are returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
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
                    "transient database error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
