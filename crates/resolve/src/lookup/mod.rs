//! Item lookup services.
//!
//! This module defines the [`ItemLookup`] trait: anything that takes a search
//! value (the leading characters of a scan) and answers with at most one
//! [`LookupRecord`].

#[cfg(feature = "http")]
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(feature = "http")]
pub use self::http::HttpLookup;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockLookup;
use crate::error::Result;
use crate::models::LookupRecord;
use async_trait::async_trait;
use std::sync::Arc;

pub type LookupHandle = Arc<dyn ItemLookup + Send + Sync>;

/// External item lookup.
///
/// Implementations should make exactly one request per call and must not
/// retry on their own; the resolver bounds each call with a timeout.
///
/// # Returns
/// - `Ok(Some(record))` when the service matched something,
/// - `Ok(None)` when it answered but matched nothing,
/// - [`LookupFailure`](crate::error::ErrorKind::LookupFailure) when the
///   service could not be reached or answered with garbage.
#[async_trait]
pub trait ItemLookup: Send + Sync {
    /// Name of the lookup (e.g. the remote method). Used for logging only.
    fn name(&self) -> &str;

    async fn lookup(&self, search_value: &str) -> Result<Option<LookupRecord>>;
}
