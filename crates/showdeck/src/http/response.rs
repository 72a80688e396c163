//! Decoded API response

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::TransportResponse;
use crate::error::{ApiFailure, Error, Result};

/// A successful, decoded API response: raw wire data plus the decoded JSON
/// body. Immutable once constructed from a transport response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    data: Value,
}

impl ApiResponse {
    /// Decode a canonical transport response.
    ///
    /// An empty body decodes to JSON `null`; any non-empty body that is not
    /// valid JSON fails with a generic API error carrying the raw status
    /// and body.
    pub(crate) fn from_transport(response: TransportResponse) -> Result<Self> {
        let data = if response.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&response.body).map_err(|_| {
                let body_text = String::from_utf8_lossy(&response.body).into_owned();
                Error::Api {
                    message: format!(
                        "Invalid response body from API: '{}' (HTTP response code was {})",
                        body_text,
                        response.status.as_u16()
                    ),
                    failure: Box::new(ApiFailure {
                        status: response.status.as_u16(),
                        headers: response.headers.clone(),
                        body: body_text,
                        payload: None,
                        request_id: response
                            .headers
                            .get("request-id")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from),
                    }),
                }
            })?
        };

        Ok(Self {
            status: response.status,
            headers: response.headers,
            body: Bytes::from(response.body),
            data,
        })
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decoded JSON body.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Deserialize the decoded body into a typed entity.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(Error::Serialization)
    }

    /// Request ID echoed by the server, for debugging and support tickets.
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get("request-id").and_then(|v| v.to_str().ok())
    }
}
