//! API resource endpoints
//!
//! Thin CRUD wrappers over the request executor, organized by resource
//! type. These hold no logic beyond path construction and typed decoding;
//! everything interesting happens in the executor.

pub mod episodes;
pub mod shows;

pub use episodes::{Episode, Episodes};
pub use shows::{Show, Shows};

use serde::Deserialize;

use crate::client::Client;

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &Client;
}

/// A page of resources.
#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    /// Always `"list"`
    pub object: String,
    /// The page contents
    pub data: Vec<T>,
    /// Whether more items exist beyond this page
    #[serde(default)]
    pub has_more: bool,
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Deleted {
    /// ID of the deleted resource
    pub id: String,
    /// Always true
    pub deleted: bool,
}
