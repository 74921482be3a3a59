//! Form Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A form error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No row exists at the given (1-based) index.
    #[display("row not found: #{_0}")]
    RowNotFound(#[error(not(source))] usize),
    /// The table schema does not declare the field being written.
    #[display("unknown field: {_0}")]
    UnknownField(#[error(not(source))] String),
    /// Table contents could not be (de)serialized.
    #[display("invalid table data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// The host refused or failed the operation.
    #[display("host error: {_0}")]
    Host(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}
