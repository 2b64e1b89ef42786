//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::InvokeError;

/// Retry policy configuration.
///
/// The default makes a single attempt; callers opt in to retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_attempts(1)
    }
}

impl RetryPolicy {
    /// Policy allowing `max_attempts` attempts with the standard backoff curve.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(20),
            multiplier: 2.0,
        }
    }

    /// Execute an async operation with retry.
    ///
    /// Only errors reporting [`InvokeError::is_retryable`] are retried.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, InvokeError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, InvokeError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let err = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            tracing::warn!(
                attempt,
                max_attempts,
                error = %err,
                "Retrying after error"
            );

            // Jitter: 75%–125% of backoff
            let jitter_factor = 0.75 + (rand_factor() * 0.5);
            tokio::time::sleep(Duration::from_secs_f64(
                backoff.as_secs_f64() * jitter_factor,
            ))
            .await;

            backoff = Duration::from_secs_f64(
                (backoff.as_secs_f64() * self.multiplier).min(self.max_backoff.as_secs_f64()),
            );
            attempt += 1;
        }
    }
}

/// Simple pseudo-random factor [0, 1) without pulling in rand crate.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    let hash = hasher.finish();
    (hash % 10000) as f64 / 10000.0
}
