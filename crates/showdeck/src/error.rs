//! Error types for the Showdeck SDK
//!
//! One closed error taxonomy for everything a logical call can produce:
//! HTTP-response errors classified by status code, connection errors from
//! the transport layer, and local validation/configuration errors. Built on
//! `thiserror`, matched exhaustively by callers.

use std::time::Duration;

use http::HeaderMap;
use thiserror::Error;

use crate::http::transport::{TransportError, TransportErrorKind};

/// Result type alias for operations that can fail with a Showdeck SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP-level detail carried by every error classified from a completed
/// response: raw status, headers and body, plus the decoded error payload
/// when the body was valid JSON.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    /// HTTP status code of the response
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
    /// Decoded JSON payload, if the body decoded
    pub payload: Option<serde_json::Value>,
    /// Request ID echoed by the server, for support tickets
    pub request_id: Option<String>,
}

/// The transport-failure class behind a [`Error::Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// The request timed out before a response arrived.
    Timeout,
    /// The connection was refused or reset.
    ConnectionFailed,
    /// TLS certificate verification failed.
    TlsFailure,
    /// Any other transport-level failure.
    Other,
}

/// Main error type for the Showdeck SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed API key (local, pre-dispatch) or HTTP 401.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message
        message: String,
        /// HTTP detail when the error came from a 401 response; `None` for
        /// local validation failures that were never dispatched
        failure: Option<Box<ApiFailure>>,
    },

    /// Permission denied (403).
    #[error("Permission denied: {message}")]
    Permission {
        /// Error message from the API
        message: String,
        /// HTTP detail
        failure: Box<ApiFailure>,
    },

    /// The request was rejected as invalid (400, 404, 422).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message from the API
        message: String,
        /// HTTP detail
        failure: Box<ApiFailure>,
    },

    /// Rate limit exceeded (429).
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message from the API
        message: String,
        /// Time to wait before retrying, if the API provided one
        retry_after: Option<Duration>,
        /// Time when the rate limit window resets
        reset_at: Option<chrono::DateTime<chrono::Utc>>,
        /// HTTP detail
        failure: Box<ApiFailure>,
    },

    /// Any other HTTP error status, or a response body that failed to
    /// decode (success or error status alike).
    #[error("API error (status {}): {message}", .failure.status)]
    Api {
        /// Error message
        message: String,
        /// HTTP detail
        failure: Box<ApiFailure>,
    },

    /// Transport-level failure that exhausted its retries.
    #[error("Connection error: {message}")]
    Connection {
        /// The failure class, matched exhaustively by callers
        kind: ConnectionKind,
        /// Human-readable message with remediation hint and retry count
        message: String,
        /// Number of retries attempted before giving up
        retries: u32,
    },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Operation intentionally unsupported.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Classify a completed HTTP response into a typed error.
    ///
    /// The body is decoded first; a body that is not valid JSON always
    /// produces an [`Error::Api`] reporting the raw status and body, never
    /// a silent fallback.
    pub fn from_response(status: u16, body: &str, headers: &HeaderMap) -> Self {
        let request_id = header_str(headers, "request-id");

        let payload: serde_json::Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => {
                let failure = Box::new(ApiFailure {
                    status,
                    headers: headers.clone(),
                    body: body.to_string(),
                    payload: None,
                    request_id,
                });
                return Error::Api {
                    message: format!(
                        "Invalid response body from API: '{}' (HTTP response code was {})",
                        body, status
                    ),
                    failure,
                };
            }
        };

        let message = error_message(&payload)
            .unwrap_or_else(|| format!("HTTP {} response from the Showdeck API", status));
        let failure = Box::new(ApiFailure {
            status,
            headers: headers.clone(),
            body: body.to_string(),
            payload: Some(payload),
            request_id,
        });

        match status {
            400 | 404 | 422 => Error::InvalidRequest { message, failure },
            401 => Error::Authentication {
                message,
                failure: Some(failure),
            },
            403 => Error::Permission { message, failure },
            429 => Error::RateLimit {
                message,
                retry_after: header_str(headers, "retry-after")
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs),
                reset_at: header_str(headers, "showdeck-ratelimit-reset")
                    .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
                    .map(|dt| dt.with_timezone(&chrono::Utc)),
                failure,
            },
            _ => Error::Api { message, failure },
        }
    }

    /// Classify a transport failure that never produced a response.
    ///
    /// `retries` is the number of retries already attempted; when greater
    /// than zero it is appended to the message so operators can see the
    /// failure was persistent.
    pub fn from_transport(err: TransportError, retries: u32) -> Self {
        let kind = match err.kind {
            TransportErrorKind::Timeout => ConnectionKind::Timeout,
            TransportErrorKind::ConnectionFailed => ConnectionKind::ConnectionFailed,
            TransportErrorKind::TlsFailure => ConnectionKind::TlsFailure,
            TransportErrorKind::Other => ConnectionKind::Other,
        };

        let hint = match kind {
            ConnectionKind::Timeout => {
                "Timed out while connecting to Showdeck. \
                 Please check your internet connection and try again."
            }
            ConnectionKind::ConnectionFailed => {
                "Unexpected error communicating with Showdeck. \
                 You may be seeing this message because your DNS is not working \
                 or the connection was reset."
            }
            ConnectionKind::TlsFailure => {
                "Could not verify Showdeck's TLS certificate. \
                 Please make sure your network is not intercepting certificates."
            }
            ConnectionKind::Other => "Unexpected error communicating with Showdeck.",
        };

        let mut message = format!("{hint} (Network error: {})", err.message);
        if retries > 0 {
            message.push_str(&format!(" Request was retried {} times.", retries));
        }

        Error::Connection {
            kind,
            message,
            retries,
        }
    }

    /// Stable machine-readable code for this error kind, used in log
    /// records and carried through to callers that only match strings.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Authentication { .. } => "authentication_error",
            Error::Permission { .. } => "permission_error",
            Error::InvalidRequest { .. } => "invalid_request_error",
            Error::RateLimit { .. } => "rate_limit_error",
            Error::Api { .. } => "api_error",
            Error::Connection { .. } => "connection_error",
            Error::InvalidUrl(_) => "invalid_url",
            Error::HttpClient(_) => "http_client_error",
            Error::Serialization(_) => "serialization_error",
            Error::MissingConfig(_) => "missing_config",
            Error::Unsupported(_) => "unsupported",
            Error::Other(_) => "other",
        }
    }

    /// HTTP detail for errors that came from a completed response.
    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Error::Authentication { failure, .. } => failure.as_deref(),
            Error::Permission { failure, .. }
            | Error::InvalidRequest { failure, .. }
            | Error::RateLimit { failure, .. }
            | Error::Api { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// HTTP status for errors that came from a completed response.
    pub fn status(&self) -> Option<u16> {
        self.failure().map(|f| f.status)
    }
}

/// Pull a human-readable message out of a decoded error payload.
///
/// The API nests messages under `error.message`; some endpoints return a
/// top-level `message` instead.
fn error_message(payload: &serde_json::Value) -> Option<String> {
    payload
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| payload.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn transport_error(kind: TransportErrorKind) -> TransportError {
        TransportError {
            kind,
            message: "boom".to_string(),
        }
    }

    #[rstest]
    #[case(400, "invalid_request_error")]
    #[case(404, "invalid_request_error")]
    #[case(422, "invalid_request_error")]
    #[case(401, "authentication_error")]
    #[case(403, "permission_error")]
    #[case(429, "rate_limit_error")]
    #[case(500, "api_error")]
    #[case(529, "api_error")]
    #[case(418, "api_error")]
    fn test_status_mapping(#[case] status: u16, #[case] expected_code: &str) {
        let body = r#"{"error":{"message":"nope"}}"#;
        let error = Error::from_response(status, body, &HeaderMap::new());
        assert_eq!(error.code(), expected_code);
        assert_eq!(error.status(), Some(status));
    }

    #[test]
    fn test_nested_error_message_extracted() {
        let body = r#"{"error":{"message":"No such episode: ep_404"}}"#;
        let error = Error::from_response(404, body, &HeaderMap::new());
        assert_matches!(error, Error::InvalidRequest { message, .. } => {
            assert_eq!(message, "No such episode: ep_404");
        });
    }

    #[test]
    fn test_top_level_message_extracted() {
        let body = r#"{"message":"bad"}"#;
        let error = Error::from_response(422, body, &HeaderMap::new());
        assert_matches!(error, Error::InvalidRequest { message, .. } => {
            assert_eq!(message, "bad");
        });
    }

    #[test]
    fn test_undecodable_body_is_generic_api_error() {
        // Even a 401 falls back to Api when the body is not JSON.
        let error = Error::from_response(401, "<html>gateway</html>", &HeaderMap::new());
        assert_matches!(error, Error::Api { ref message, ref failure } => {
            assert!(message.contains("<html>gateway</html>"));
            assert!(message.contains("401"));
            assert_eq!(failure.status, 401);
            assert!(failure.payload.is_none());
        });
    }

    #[test]
    fn test_failure_carries_raw_body_and_payload() {
        let body = r#"{"error":{"message":"nope"},"doc_url":"https://showdeck.io/docs"}"#;
        let error = Error::from_response(400, body, &HeaderMap::new());
        let failure = error.failure().unwrap();
        assert_eq!(failure.body, body);
        let payload = failure.payload.as_ref().unwrap();
        assert_eq!(payload["doc_url"], "https://showdeck.io/docs");
    }

    #[test]
    fn test_rate_limit_headers_parsed() {
        let body = r#"{"error":{"message":"slow down"}}"#;
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "30".parse().unwrap());
        headers.insert(
            "showdeck-ratelimit-reset",
            "2026-08-05T20:00:00Z".parse().unwrap(),
        );

        let error = Error::from_response(429, body, &headers);
        assert_matches!(error, Error::RateLimit { retry_after, reset_at, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(30)));
            assert!(reset_at.is_some());
        });
    }

    #[test]
    fn test_request_id_propagated() {
        let body = r#"{"error":{"message":"nope"}}"#;
        let mut headers = HeaderMap::new();
        headers.insert("request-id", "req_123".parse().unwrap());

        let error = Error::from_response(500, body, &headers);
        assert_eq!(
            error.failure().unwrap().request_id.as_deref(),
            Some("req_123")
        );
    }

    #[rstest]
    #[case(TransportErrorKind::Timeout, ConnectionKind::Timeout, "Timed out")]
    #[case(
        TransportErrorKind::ConnectionFailed,
        ConnectionKind::ConnectionFailed,
        "DNS"
    )]
    #[case(
        TransportErrorKind::TlsFailure,
        ConnectionKind::TlsFailure,
        "TLS certificate"
    )]
    #[case(TransportErrorKind::Other, ConnectionKind::Other, "Unexpected error")]
    fn test_transport_mapping(
        #[case] kind: TransportErrorKind,
        #[case] expected: ConnectionKind,
        #[case] hint_fragment: &str,
    ) {
        let error = Error::from_transport(transport_error(kind), 0);
        assert_matches!(error, Error::Connection { kind, ref message, retries } => {
            assert_eq!(kind, expected);
            assert!(message.contains(hint_fragment), "missing hint in {message:?}");
            assert!(!message.contains("retried"));
            assert_eq!(retries, 0);
        });
    }

    #[test]
    fn test_transport_error_reports_retry_count() {
        let error = Error::from_transport(transport_error(TransportErrorKind::Timeout), 2);
        assert_matches!(error, Error::Connection { ref message, retries, .. } => {
            assert!(message.contains("Request was retried 2 times."));
            assert_eq!(retries, 2);
        });
    }

    #[test]
    fn test_local_authentication_has_no_http_detail() {
        let error = Error::Authentication {
            message: "No API key provided".to_string(),
            failure: None,
        };
        assert!(error.failure().is_none());
        assert!(error.status().is_none());
        assert_eq!(error.code(), "authentication_error");
    }
}
