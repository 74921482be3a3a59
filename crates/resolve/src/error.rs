//! Resolution Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::time::Duration;

/// A resolution error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The scanned text is too short to be a serial number. Rescan.
    #[display("input too short: {length} characters, at least {minimum} required")]
    InputTooShort {
        /// Length of the rejected input, in characters.
        length: usize,
        /// Configured minimum length.
        minimum: usize,
    },
    /// Nothing usable came back for the search key.
    #[display("item not found: {_0}")]
    ItemNotFound(#[error(not(source))] String),
    /// The lookup service failed or returned something unreadable.
    #[display("item lookup failed")]
    LookupFailure,
    /// The lookup service did not answer in time.
    #[display("item lookup timed out after {}ms", _0.as_millis())]
    Timeout(#[error(not(source))] Duration),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this crate retries on its own; this tells the caller
    /// whether a rescan of the same code is worth asking for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupFailure | Self::Timeout(_))
    }
}
