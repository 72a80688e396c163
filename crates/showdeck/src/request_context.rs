//! Per-call request context for structured logging
//!
//! A `RequestContext` captures what one logical call looked like at dispatch
//! time. It is replaced, never mutated: when a response carries
//! authoritative header data (the server echoes the account, version and
//! idempotency key it actually served), a fresh copy is derived so log
//! records for an earlier attempt keep their original values.

use http::HeaderMap;

/// Immutable-per-attempt record describing a request for log output.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Account the call was scoped to, if any
    pub account: Option<String>,
    /// Masked API key (last four characters only)
    pub api_key: Option<String>,
    /// API version pinned for the call
    pub api_version: Option<String>,
    /// Encoded request body
    pub body: Option<String>,
    /// HTTP method
    pub method: String,
    /// Path-only request target
    pub path: String,
    /// Encoded query string, if any
    pub query: Option<String>,
    /// Idempotency key attached to the call
    pub idempotency_key: Option<String>,
}

impl RequestContext {
    /// Derive a new context with account, version and idempotency key
    /// overwritten from response headers. Response headers are
    /// authoritative over locally-set configuration; fields without a
    /// corresponding header keep their current value, and a header-less
    /// response (some transport failures) leaves the context unchanged.
    pub fn apply_response_headers(&self, headers: &HeaderMap) -> Self {
        let mut derived = self.clone();
        if let Some(account) = header_str(headers, "showdeck-account") {
            derived.account = Some(account);
        }
        if let Some(version) = header_str(headers, "showdeck-version") {
            derived.api_version = Some(version);
        }
        if let Some(key) = header_str(headers, "idempotency-key") {
            derived.idempotency_key = Some(key);
        }
        derived
    }
}

/// Mask an API key down to its last four characters for log output.
pub(crate) fn mask_api_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("sk_...{tail}")
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
