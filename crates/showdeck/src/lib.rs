//! # Showdeck Rust SDK
//!
//! Rust client for the Showdeck podcast hosting REST API:
//! - Typed resources (episodes, shows) over one request pipeline
//! - Form-encoded requests, JSON responses
//! - Automatic retries of transient transport failures with jittered
//!   backoff and idempotency keys
//! - A closed, typed error taxonomy
//! - Task-scoped active-client binding for implicit resource calls
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use showdeck::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("sk_live_...");
//!
//!     let episode = client.episodes().get("ep_123").await?;
//!     println!("{}", episode.title);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiFailure, ConnectionKind, Error, Result};
pub use executor::RequestOptions;
pub use http::ApiResponse;
pub use resources::{Deleted, Episode, Episodes, List, Show, Shows};
pub use scope::{Scope, run_scoped};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod form;
pub mod http;
pub mod observability;
pub mod request_context;
pub mod resources;
pub mod retry;
pub mod scope;
pub mod useragent;

// Re-export key dependencies for convenience
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use showdeck::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, Error, Result,
        executor::RequestOptions,
        resources::{Episode, Episodes, List, Show, Shows},
        scope::{Scope, run_scoped},
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.showdeck.io";

/// Default API version header value
pub const DEFAULT_API_VERSION: &str = "2025-11-15";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "https://api.showdeck.io");
        assert_eq!(DEFAULT_API_VERSION, "2025-11-15");
    }
}
