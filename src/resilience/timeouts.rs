//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap provider calls with a per-call deadline
//! - Classify an elapsed deadline as a provider failure
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the inner future is dropped on expiry
//! - A timeout is indistinguishable from a network error or 5xx to callers

use std::future::Future;
use std::time::Duration;

use crate::lookup::LookupError;

/// Run `call` under `timeout`, mapping an elapsed deadline to `Unavailable`.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, LookupError>
where
    F: Future<Output = Result<T, LookupError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Unavailable(format!(
            "timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}
