//! Exponential backoff with bounded jitter.

use super::strategy::BackoffStrategy;
use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff strategy with bounded jitter.
///
/// Delays double with each retry, capped at `max_delay`, then get scaled by
/// a jitter factor drawn uniformly from `[0.5, 1.0]` and floored at
/// `initial_delay`:
///
/// ```text
/// base(n)  = initial_delay * 2^(n - 1)        n >= 1
/// delay(n) = max(min(base(n), max_delay) * U[0.5, 1.0], initial_delay)
/// ```
///
/// The floor guarantees the jittered delay never undercuts the configured
/// minimum, so every delay lands in `[initial_delay, max_delay]`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// The configured initial (and minimum) delay.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// The configured delay ceiling.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

impl Default for ExponentialBackoff {
    /// Defaults: 2 retries, 500ms initial delay, 2s ceiling.
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(2),
        }
    }
}

#[async_trait]
impl BackoffStrategy for ExponentialBackoff {
    async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Error + Send + Sync + 'static,
    {
        let mut attempts = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) if !self.should_retry(&err, attempts) => return Err(err),
                Err(err) if attempts >= self.max_retries => return Err(err),
                Err(_) => {
                    attempts += 1;
                    tokio::time::sleep(self.delay_for(attempts)).await;
                }
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        // Past 2^63 growth the cap has long since taken over.
        let attempt = attempt.clamp(1, 64);
        let base = self.initial_delay.as_secs_f64() * 2f64.powi(attempt as i32 - 1);
        let capped = base.min(self.max_delay.as_secs_f64());

        // Uniform jitter in [0.5, 1.0], floored at the initial delay.
        let jitter = 0.5 + rand::random::<f64>() * 0.5;
        let jittered = capped * jitter;

        Duration::from_secs_f64(jittered.max(self.initial_delay.as_secs_f64()))
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for configuring [`ExponentialBackoff`].
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
}

impl ExponentialBackoffBuilder {
    /// Set the maximum number of retry attempts. Default: 2.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the delay before the first retry (also the jitter floor).
    /// Default: 500ms.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between retries. Default: 2s.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Build the `ExponentialBackoff` instance.
    pub fn build(self) -> ExponentialBackoff {
        let defaults = ExponentialBackoff::default();
        ExponentialBackoff {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            initial_delay: self.initial_delay.unwrap_or(defaults.initial_delay),
            max_delay: self.max_delay.unwrap_or(defaults.max_delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn backoff_05_2() -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .max_retries(5)
            .initial_delay(Duration::from_millis(500))
            .max_delay(Duration::from_secs(2))
            .build()
    }

    #[test]
    fn test_delay_within_bounds_every_attempt() {
        let backoff = backoff_05_2();
        for attempt in 1..10 {
            for _ in 0..50 {
                let delay = backoff.delay_for(attempt);
                assert!(
                    delay >= Duration::from_millis(500) && delay <= Duration::from_secs(2),
                    "delay for attempt {} out of [0.5s, 2s]: {:?}",
                    attempt,
                    delay
                );
            }
        }
    }

    #[test]
    fn test_first_retry_floored_at_initial() {
        // base(1) == initial, so jitter alone would halve it; the floor
        // must bring it back up.
        let backoff = backoff_05_2();
        for _ in 0..50 {
            assert!(backoff.delay_for(1) >= Duration::from_millis(500));
        }
    }

    #[test]
    fn test_growth_is_capped() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(100)
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .build();

        for attempt in 5..12 {
            assert!(backoff.delay_for(attempt) <= Duration::from_secs(5));
        }
    }

    #[test]
    fn test_attempt_zero_treated_as_first_retry() {
        let backoff = backoff_05_2();
        let delay = backoff.delay_for(0);
        assert!(delay >= Duration::from_millis(500) && delay <= Duration::from_secs(2));
    }

    proptest! {
        /// Property: for every attempt number the delay stays inside
        /// [initial_delay, max_delay], regardless of the jitter draw.
        #[test]
        fn prop_delay_bounded(attempt in 1u32..64) {
            let backoff = backoff_05_2();
            let delay = backoff.delay_for(attempt);
            prop_assert!(delay >= Duration::from_millis(500));
            prop_assert!(delay <= Duration::from_secs(2));
        }
    }

    #[tokio::test]
    async fn test_retry_success_on_third_attempt() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(5)
            .initial_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(4))
            .build();

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = backoff
            .execute(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let current = attempts.fetch_add(1, Ordering::SeqCst);
                    if current < 2 {
                        Err(std::io::Error::other("retry me"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_max_retries_exceeded() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(2)
            .initial_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(4))
            .build();

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = backoff
            .execute(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::other("always fail"))
                }
            })
            .await;

        assert!(result.is_err());
        // Initial attempt + 2 retries.
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let backoff = ExponentialBackoff::default();

        let result = backoff
            .execute(|| async { Ok::<_, std::io::Error>(42) })
            .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_builder_defaults() {
        let backoff = ExponentialBackoff::builder().build();

        assert_eq!(backoff.max_retries, 2);
        assert_eq!(backoff.initial_delay, Duration::from_millis(500));
        assert_eq!(backoff.max_delay, Duration::from_secs(2));
    }
}
