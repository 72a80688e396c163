#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry abstractions for the Showdeck SDK.
//!
//! This crate provides the backoff machinery shared across the Showdeck
//! ecosystem:
//!
//! - **Universal retry strategies** via the `BackoffStrategy` trait
//!   - Exponential backoff with bounded jitter
//!   - Custom retry predicates
//!
//! The SDK's network retry policy (which failures are worth retrying) lives
//! in the `showdeck` crate; this crate only knows how to space attempts out.
//!
//! # Examples
//!
//! ```rust
//! use showdeck_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backoff = ExponentialBackoff::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(500))
//!     .build();
//!
//! let result = backoff.execute(|| async {
//!     Ok::<_, std::io::Error>(42)
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::retry::{BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder};
}
