//! Retry utilities: backoff builders and retryable error classification.
//!
//! Uses `backon` for exponential backoff with jitter. Only the initial load
//! retries; submissions and post-confirmation re-reads never do.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use sui_sync_client::{ClientError, Result};
use tracing::warn;

use crate::config::RetryConfig;

/// Backoff for initial-load reads, built from config. Jitter enabled.
pub fn read_backoff(config: &RetryConfig) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(config.min_delay_ms))
        .with_max_delay(Duration::from_millis(config.max_delay_ms))
        .with_max_times(config.max_attempts)
        .with_jitter()
}

/// Determines if a read error is retryable (transport failures only).
///
/// Non-retryable:
/// - `NotFound`, `MalformedResponse`: the ledger answered; asking again
///   gives the same answer.
/// - `InvalidArgument`, `NoSigner`, `Rejected`: local or final.
pub fn is_retryable(err: &ClientError) -> bool {
    err.is_transport_error()
}

/// Run `load` until it succeeds or fails with a non-retryable error.
pub async fn load_with_retry<T, F, Fut>(config: &RetryConfig, load: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    load.retry(read_backoff(config))
        .when(is_retryable)
        .notify(|err: &ClientError, dur: Duration| {
            warn!(error = %err, delay = ?dur, "Load failed, retrying");
        })
        .await
}
