//! Transport trait and canonical wire shapes
//!
//! Every transport implementation normalizes its responses and failures
//! into the shapes below before they reach the core, so the executor and
//! classifier never branch on implementation-specific types.

use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::fmt;
use thiserror::Error;
use url::Url;

/// A fully-built request, ready for dispatch.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL, query string included
    pub url: Url,
    /// All request headers (auth, content type, user agent, ...)
    pub headers: HeaderMap,
    /// Form-encoded body bytes, for methods that carry one
    pub body: Option<Vec<u8>>,
}

/// Canonical completed-response shape: status, headers, raw body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Vec<u8>,
}

/// The failure classes a transport can surface for a request that never
/// produced a complete response. Matched exhaustively by the retry policy
/// and the error classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Open or read timed out.
    Timeout,
    /// Connection refused, reset, or could not be established.
    ConnectionFailed,
    /// TLS handshake or certificate verification failed.
    TlsFailure,
    /// Anything else.
    Other,
}

/// A transport-level failure: no complete HTTP response exists.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Failure class
    pub kind: TransportErrorKind,
    /// Underlying error description
    pub message: String,
}

impl TransportError {
    /// Construct a transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A connection-reusing HTTP dispatcher.
///
/// Implementations own connection pooling, TLS, timeouts and proxying; the
/// SDK owns encoding, retries and classification. One transport instance
/// serves many sequential logical calls on its owning client.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Dispatch one request attempt and wait for the full response body.
    ///
    /// Cancellation follows the host environment's standard mechanism:
    /// dropping the returned future aborts the in-flight request.
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}
