//! Default `Transport` implementation backed by `reqwest`
//!
//! One `ReqwestTransport` owns one pooled `reqwest::Client`, configured
//! from the SDK's [`ClientConfig`]: open/read timeouts, proxy, TLS
//! verification toggle and custom CA bundle. Its only job beyond dispatch
//! is normalizing `reqwest` failures onto [`TransportErrorKind`].

use async_trait::async_trait;

use super::transport::{
    Transport, TransportError, TransportErrorKind, TransportRequest, TransportResponse,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// `reqwest`-backed transport with a reusable connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is invalid, the CA bundle cannot
    /// be read, or the underlying HTTP client fails to initialize.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::HttpClient(format!("Invalid proxy URL '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }

        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(bundle) = &config.ca_bundle {
            let pem = std::fs::read(bundle).map_err(|e| {
                Error::HttpClient(format!("Failed to read CA bundle {}: {e}", bundle.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| Error::HttpClient(format!("Invalid CA bundle: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(normalize_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(normalize_error)?
            .to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

/// Map a `reqwest` failure onto the closed transport-failure taxonomy.
fn normalize_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if chain_mentions_tls(&err) {
        TransportErrorKind::TlsFailure
    } else if err.is_connect() || err.is_body() {
        // Body read failures on an established connection are the
        // connection-reset class.
        TransportErrorKind::ConnectionFailed
    } else {
        TransportErrorKind::Other
    };

    TransportError::new(kind, err.to_string())
}

/// `reqwest` does not expose TLS failures as a distinct predicate, so walk
/// the source chain for certificate/handshake vocabulary.
fn chain_mentions_tls(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct FakeError {
        message: String,
        #[source]
        source: Option<Box<FakeError>>,
    }

    #[test]
    fn test_tls_detection_walks_source_chain() {
        let inner = FakeError {
            message: "invalid peer certificate".to_string(),
            source: None,
        };
        let outer = FakeError {
            message: "error sending request".to_string(),
            source: Some(Box::new(inner)),
        };
        assert!(chain_mentions_tls(&outer));

        let plain = FakeError {
            message: "connection refused".to_string(),
            source: None,
        };
        assert!(!chain_mentions_tls(&plain));
    }

    #[test]
    fn test_from_default_config() {
        let transport = ReqwestTransport::from_config(&ClientConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let config = ClientConfig {
            proxy: Some("not a url".to_string()),
            ..ClientConfig::default()
        };
        let result = ReqwestTransport::from_config(&config);
        assert!(matches!(result, Err(Error::HttpClient(_))));
    }

    #[test]
    fn test_missing_ca_bundle_rejected() {
        let config = ClientConfig {
            ca_bundle: Some(PathBuf::from("/nonexistent/bundle.pem")),
            ..ClientConfig::default()
        };
        let result = ReqwestTransport::from_config(&config);
        assert!(matches!(result, Err(Error::HttpClient(_))));
    }
}
