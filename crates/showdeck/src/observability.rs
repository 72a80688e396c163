//! Structured logging for the request pipeline
//!
//! All request, response, retry and failure records go through this layer,
//! keyed by the call's [`RequestContext`]. Info-level records are one-line
//! summaries; debug-level records carry the encoded body and query. The
//! library never installs a subscriber.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::http::transport::TransportError;
use crate::request_context::RequestContext;

/// Log emitter bound to one logical call's context.
pub(crate) struct RequestLog<'a> {
    context: &'a RequestContext,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(context: &'a RequestContext) -> Self {
        Self { context }
    }

    /// Record a dispatch attempt. `attempt` is 0 for the initial try.
    pub(crate) fn request(&self, attempt: u32) {
        info!(
            method = %self.context.method,
            path = %self.context.path,
            account = self.context.account.as_deref(),
            api_version = self.context.api_version.as_deref(),
            idempotency_key = self.context.idempotency_key.as_deref(),
            attempt,
            "Sending request to Showdeck"
        );
        debug!(
            method = %self.context.method,
            path = %self.context.path,
            query = self.context.query.as_deref(),
            body = self.context.body.as_deref(),
            api_key = self.context.api_key.as_deref(),
            "Request details"
        );
    }

    /// Record a completed response.
    pub(crate) fn response(&self, status: u16, elapsed: Duration, retries: u32) {
        info!(
            method = %self.context.method,
            path = %self.context.path,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            retries,
            idempotency_key = self.context.idempotency_key.as_deref(),
            "Response received from Showdeck"
        );
    }

    /// Record a transport failure that will be retried.
    pub(crate) fn retry(&self, failure: &TransportError, attempt: u32, delay: Duration) {
        warn!(
            method = %self.context.method,
            path = %self.context.path,
            error = %failure,
            attempt,
            delay_ms = delay.as_millis() as u64,
            idempotency_key = self.context.idempotency_key.as_deref(),
            "Transport failure, retrying after backoff"
        );
    }

    /// Record a classified error just before it is raised, so failures are
    /// observable even when the caller only matches a broad error type.
    pub(crate) fn error(&self, err: &Error) {
        error!(
            method = %self.context.method,
            path = %self.context.path,
            status = err.status(),
            code = err.code(),
            message = %err,
            idempotency_key = self.context.idempotency_key.as_deref(),
            "Request to Showdeck failed"
        );
    }
}

/// Timer for measuring request duration.
pub(crate) struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub(crate) fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
