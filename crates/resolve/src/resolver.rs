//! Resolution strategies.
//!
//! Both strategies share the same length rules and produce the same
//! [`ResolvedItem`]; they differ only in where the item code comes from.
//!
//! - [`HeuristicResolver`] derives it locally from the scan prefix. The
//!   serial number itself is assumed to encode the item.
//! - [`LookupResolver`] asks an [`ItemLookup`](crate::lookup::ItemLookup)
//!   service, keyed by the scan prefix, and waits at most a fixed timeout
//!   for the answer.

use crate::error::{ErrorKind, Result};
use crate::input::ScanRules;
use crate::lookup::LookupHandle;
use crate::models::ResolvedItem;
use async_trait::async_trait;
use exn::ResultExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub type ResolverHandle = Arc<dyn ScanResolver + Send + Sync>;

/// Tag prepended to derived item codes by default.
pub const DEFAULT_ITEM_TAG: &str = "XX";
/// Default upper bound on a single lookup call.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maps raw scanned text to a [`ResolvedItem`].
///
/// Resolution happens once per scan. Callers must not start a second
/// resolution for the same scanner before the first has finished.
#[async_trait]
pub trait ScanResolver: Send + Sync {
    /// Strategy name, for logging.
    fn name(&self) -> &str;

    /// # Errors
    /// - [`ErrorKind::InputTooShort`] before anything else is attempted,
    /// - [`ErrorKind::ItemNotFound`] when no item code could be found,
    /// - [`ErrorKind::LookupFailure`] / [`ErrorKind::Timeout`] when the
    ///   lookup service failed.
    async fn resolve(&self, raw: &str) -> Result<ResolvedItem>;
}

/// Local resolution: item code = tag + scan prefix, no network.
///
/// # Examples
///
/// ```
/// use stockscan_resolve::{HeuristicResolver, ScanResolver, ScanRules};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = HeuristicResolver::new(ScanRules::default());
/// let item = resolver.resolve("AB123456XXXXXXXXXXXXXXXX").await?;
/// assert_eq!(item.item_code, "XXAB1234");
/// assert_eq!(item.serial_no, "AB123456XXXXXXXXXXXXXXXX");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicResolver {
    rules: ScanRules,
    item_tag: String,
}
impl HeuristicResolver {
    pub fn new(rules: ScanRules) -> Self {
        Self { rules, item_tag: DEFAULT_ITEM_TAG.to_string() }
    }

    /// Replace the tag prepended to derived item codes (may be empty).
    pub fn with_item_tag(mut self, item_tag: impl Into<String>) -> Self {
        self.item_tag = item_tag.into();
        self
    }
}

#[async_trait]
impl ScanResolver for HeuristicResolver {
    fn name(&self) -> &str {
        "heuristic"
    }

    #[instrument(skip_all, fields(strategy = "heuristic"))]
    async fn resolve(&self, raw: &str) -> Result<ResolvedItem> {
        let input = self.rules.validate(raw)?;
        let item_code = format!("{}{}", self.item_tag, input.prefix());
        if item_code.is_empty() {
            exn::bail!(ErrorKind::ItemNotFound(input.prefix().to_string()));
        }
        tracing::debug!(%item_code, "Derived item code from scan");
        Ok(ResolvedItem::new(item_code, input.as_str()))
    }
}

/// Remote resolution through an [`ItemLookup`](crate::lookup::ItemLookup).
///
/// Exactly one lookup is issued per scan, keyed by the scan prefix. The
/// returned record's serial number is replaced by the full scan.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use stockscan_resolve::lookup::MockLookup;
/// use stockscan_resolve::{LookupRecord, LookupResolver, ScanResolver, ScanRules};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let lookup = Arc::new(MockLookup::with_records([("AB1234", LookupRecord::item("HORSESHOE"))]));
/// let resolver = LookupResolver::new(ScanRules::default(), lookup).with_timeout(Duration::from_secs(2));
/// let item = resolver.resolve("AB123456XXXXXXXXXXXXXXXX").await?;
/// assert_eq!(item.item_code, "HORSESHOE");
/// # Ok(())
/// # }
/// ```
pub struct LookupResolver {
    rules: ScanRules,
    lookup: LookupHandle,
    timeout: Duration,
}
impl LookupResolver {
    pub fn new(rules: ScanRules, lookup: LookupHandle) -> Self {
        Self { rules, lookup, timeout: DEFAULT_LOOKUP_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ScanResolver for LookupResolver {
    fn name(&self) -> &str {
        "lookup"
    }

    #[instrument(skip_all, fields(strategy = "lookup"))]
    async fn resolve(&self, raw: &str) -> Result<ResolvedItem> {
        let input = self.rules.validate(raw)?;
        let search_value = input.prefix();
        let record = match tokio::time::timeout(self.timeout, self.lookup.lookup(search_value)).await {
            Ok(answer) => answer?,
            Err(elapsed) => {
                tracing::warn!(search_value, timeout_ms = self.timeout.as_millis() as u64, "Lookup timed out");
                return Err(elapsed).or_raise(|| ErrorKind::Timeout(self.timeout));
            },
        };
        match record.and_then(|record| record.into_resolved(&input)) {
            Some(item) => Ok(item),
            None => exn::bail!(ErrorKind::ItemNotFound(search_value.to_string())),
        }
    }
}
