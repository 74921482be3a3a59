//! Command-Line Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Rejected scans are not errors here: they are counted and the run goes on.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration cannot drive a scanner.
    #[display("invalid configuration: {_0}")]
    Config(#[error(not(source))] &'static str),
    /// The item table file could not be read or parsed.
    #[display("cannot read item table: {}", _0.display())]
    ReadTable(#[error(not(source))] PathBuf),
    /// The item table file could not be written.
    #[display("cannot write item table: {}", _0.display())]
    WriteTable(#[error(not(source))] PathBuf),
    /// Scans could not be read from standard input.
    #[display("cannot read scans from standard input")]
    Input,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteTable(_) | Self::Input)
    }
}
