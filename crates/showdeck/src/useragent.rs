//! User-agent headers
//!
//! Every request carries two identifying headers: a plain `User-Agent`
//! string and an `X-Showdeck-Client-User-Agent` JSON fingerprint describing
//! the bindings, runtime and host. The fingerprint is rebuilt per request
//! and degrades to a raw-string fallback if JSON encoding ever fails.

use serde::Serialize;

/// The `User-Agent` header value.
pub fn user_agent() -> String {
    format!("Showdeck/v1 RustBindings/{}", crate::VERSION)
}

#[derive(Debug, Serialize)]
struct ClientFingerprint {
    bindings_version: &'static str,
    lang: &'static str,
    lang_version: &'static str,
    platform: String,
    engine: &'static str,
    publisher: &'static str,
    hostname: String,
}

impl ClientFingerprint {
    fn collect() -> Self {
        Self {
            bindings_version: crate::VERSION,
            lang: "rust",
            lang_version: option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown"),
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            engine: "tokio",
            publisher: "showdeck",
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

/// The `X-Showdeck-Client-User-Agent` header value.
pub fn client_user_agent() -> String {
    let fingerprint = ClientFingerprint::collect();
    serde_json::to_string(&fingerprint)
        .unwrap_or_else(|e| format!("(error encoding client user agent: {e})"))
}
