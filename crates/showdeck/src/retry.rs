//! Network retry policy
//!
//! Only transport-level failures are ever retried: a timeout or a
//! refused/reset connection may succeed on a second attempt, while a
//! completed HTTP response (any status) is a definitive answer from the
//! server. The policy takes [`TransportError`] by type, so HTTP-response
//! errors cannot even be offered for retry.

use std::time::Duration;

use showdeck_core::retry::{BackoffStrategy, ExponentialBackoff};

use crate::config::ClientConfig;
use crate::http::transport::{TransportError, TransportErrorKind};

/// Decides retryability of transport failures and spaces out attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: ExponentialBackoff,
}

impl RetryPolicy {
    /// Build a policy with explicit parameters.
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: ExponentialBackoff::builder()
                .max_retries(max_retries)
                .initial_delay(initial_delay)
                .max_delay(max_delay)
                .build(),
        }
    }

    /// Build a policy from client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.max_network_retries,
            config.initial_retry_delay,
            config.max_retry_delay,
        )
    }

    /// Whether any retries are configured at all. Controls automatic
    /// idempotency-key generation for non-idempotent methods.
    pub fn enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Maximum number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decide whether a failed attempt should be retried.
    ///
    /// `attempts_so_far` counts retries already performed (0 before the
    /// first retry).
    pub fn should_retry(&self, error: &TransportError, attempts_so_far: u32) -> bool {
        if attempts_so_far >= self.max_retries {
            return false;
        }
        match error.kind {
            TransportErrorKind::Timeout | TransportErrorKind::ConnectionFailed => true,
            TransportErrorKind::TlsFailure | TransportErrorKind::Other => false,
        }
    }

    /// Delay before retry number `attempt` (counted from 1), freshly
    /// jittered on every call.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff.delay_for(attempt)
    }
}
