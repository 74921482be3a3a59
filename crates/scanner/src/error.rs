//! Scanner Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Every failed scan ends in exactly one
//! of these kinds, and the kind decides which alert the user sees.

use derive_more::{Display, Error};
use stockscan_resolve::error::{Error as ResolveError, ErrorKind as ResolveErrorKind};

/// A scanner error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a scan failed.
///
/// ### Scan Errors (user must rescan)
/// - [`ErrorKind::InputTooShort`]
/// - [`ErrorKind::ItemNotFound`]
/// - [`ErrorKind::DuplicateSerial`]
/// - [`ErrorKind::LookupFailure`]
///
/// ### Operational Errors
/// - [`ErrorKind::InvalidIncrement`]
/// - [`ErrorKind::Table`]
/// - [`ErrorKind::Config`]
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// The input was too short to be a serial number.
    #[display("serial number not scanned")]
    InputTooShort,
    /// Resolution produced no usable item code.
    #[display("cannot find item")]
    ItemNotFound,
    /// The serial number is already recorded against the same item.
    #[display("serial number {_0} is already added")]
    DuplicateSerial(#[error(not(source))] String),
    /// The lookup service failed or timed out.
    #[display("item lookup failed")]
    LookupFailure,
    /// Quantity increments must be finite and positive.
    #[display("invalid quantity increment: {_0}")]
    InvalidIncrement(#[error(not(source))] f64),
    /// Reading or writing the item table failed.
    #[display("item table error")]
    Table,
    /// The scanner cannot be built from its configuration.
    #[display("invalid scanner configuration: {_0}")]
    Config(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupFailure | Self::Table)
    }
}

impl ErrorKind {
    /// Convert a resolution error into a scanner error, keeping the resolve
    /// crate's `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn resolution(err: ResolveError) -> Error {
        let kind = Self::from(&*err);
        err.raise(kind)
    }
}

impl From<&ResolveErrorKind> for ErrorKind {
    fn from(kind: &ResolveErrorKind) -> Self {
        match kind {
            ResolveErrorKind::InputTooShort { .. } => Self::InputTooShort,
            ResolveErrorKind::ItemNotFound(_) => Self::ItemNotFound,
            ResolveErrorKind::LookupFailure | ResolveErrorKind::Timeout(_) => Self::LookupFailure,
        }
    }
}
