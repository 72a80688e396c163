//! HTTP layer: the transport seam and response handling
//!
//! The SDK never talks to the network directly; it hands a canonical
//! request shape to an injected [`Transport`] and gets back a canonical
//! `{status, headers, body}` response or a tagged transport failure. The
//! default implementation is [`ReqwestTransport`].

pub use reqwest_transport::ReqwestTransport;
pub use response::ApiResponse;
pub use transport::{Transport, TransportError, TransportErrorKind, TransportRequest, TransportResponse};

mod reqwest_transport;
mod response;
pub mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
