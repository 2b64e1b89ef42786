//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::InvokeError;

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, InvokeError>>,
) -> Result<T, InvokeError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(InvokeError::Timeout(duration.as_millis() as u64)),
    }
}
