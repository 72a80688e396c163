//! The `BackoffStrategy` trait.

use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::time::Duration;

/// A strategy for retrying failed operations with backoff.
///
/// Implementations determine how long to wait between attempts and when to
/// give up. Whether a particular error is *worth* retrying is decided by
/// [`BackoffStrategy::should_retry`], which callers override for
/// error-specific logic (the SDK, for instance, only retries transport
/// failures, never completed HTTP responses).
///
/// # Examples
///
/// ```rust
/// use showdeck_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(3)
///     .initial_delay(Duration::from_millis(500))
///     .build();
///
/// let result = backoff.execute(|| async {
///     Ok::<_, std::io::Error>(42)
/// }).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait BackoffStrategy: Send + Sync {
    /// Execute an operation with retry logic.
    ///
    /// The operation is called repeatedly until it succeeds, a
    /// non-retryable error occurs, or the maximum number of retries is
    /// exceeded. Retries of one operation are strictly sequential; the only
    /// suspension point is the sleep between attempts.
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Error + Send + Sync + 'static;

    /// Determine if an error is retryable.
    ///
    /// Default implementation returns `true` for all errors. Override to
    /// restrict retries to specific failure classes.
    ///
    /// `attempt` is the number of retries already performed (0 before the
    /// first retry).
    fn should_retry(&self, error: &dyn Error, attempt: u32) -> bool {
        let _ = (error, attempt);
        true
    }

    /// Calculate the delay before retry number `attempt`.
    ///
    /// Attempts are counted starting at 1 for the first retry. The delay is
    /// computed fresh on every call, so repeated calls for the same attempt
    /// draw fresh jitter.
    fn delay_for(&self, attempt: u32) -> Duration;

    /// The maximum number of retries after the initial attempt.
    ///
    /// `max_retries() == 3` means up to 4 calls total.
    fn max_retries(&self) -> u32;
}
