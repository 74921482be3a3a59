//! In-memory item lookup for testing.

use crate::error::{ErrorKind, Result};
use crate::lookup::ItemLookup;
use crate::models::LookupRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory item lookup for testing.
///
/// Answers from a fixed map of search value to record, optionally after an
/// artificial delay, and remembers every search value it was asked for.
///
/// # Examples
///
/// ```
/// use stockscan_resolve::lookup::{ItemLookup, MockLookup};
/// use stockscan_resolve::LookupRecord;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let lookup = MockLookup::with_records([("AB1234", LookupRecord::item("HORSESHOE"))]);
/// assert!(lookup.lookup("AB1234").await?.is_some());
/// assert!(lookup.lookup("ZZ9999").await?.is_none());
/// assert_eq!(lookup.calls().await, ["AB1234", "ZZ9999"]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockLookup {
    records: HashMap<String, LookupRecord>,
    delay: Option<Duration>,
    failing: bool,
    calls: Mutex<Vec<String>>,
}

impl MockLookup {
    pub fn with_records(records: impl IntoIterator<Item = (impl Into<String>, LookupRecord)>) -> Self {
        Self {
            records: records.into_iter().map(|(key, record)| (key.into(), record)).collect(),
            ..Self::default()
        }
    }

    /// Sleep for the given duration before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer every call with [`ErrorKind::LookupFailure`].
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Search values received so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ItemLookup for MockLookup {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, search_value: &str) -> Result<Option<LookupRecord>> {
        self.calls.lock().await.push(search_value.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            exn::bail!(ErrorKind::LookupFailure);
        }
        Ok(self.records.get(search_value).cloned())
    }
}
