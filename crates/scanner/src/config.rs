//! Scanner configuration.
//!
//! Binds the scanner to a particular form: which field the reader types
//! into, which field holds the selected warehouse, which child table rows go
//! into and what the columns of that table are called. Configured once; a
//! [`Scanner`](crate::Scanner) never changes its configuration.

use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use stockscan_resolve::lookup::LookupHandle;
use stockscan_resolve::{
    DEFAULT_ITEM_TAG, DEFAULT_LOOKUP_TIMEOUT, HeuristicResolver, LookupResolver, ResolverHandle, ScanRules,
};

/// Remote method used by the lookup strategy unless configured otherwise.
pub const DEFAULT_LOOKUP_METHOD: &str = "erpnext.stock.utils.scan_barcode";
/// Sound played on any failed scan unless configured otherwise.
pub const DEFAULT_FAIL_SOUND: &str = "error";
/// How long alerts stay on screen.
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_secs(3);

/// Where the item code of a scan comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Derived from the scan prefix, no network.
    Heuristic,
    /// Asked of an external lookup service.
    #[default]
    Lookup,
}

/// Names of the columns of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowFields {
    pub item_code: String,
    pub warehouse: String,
    pub barcode: String,
    pub serial_no: String,
    pub batch_no: String,
    pub uom: String,
    pub qty: String,
}
impl Default for RowFields {
    fn default() -> Self {
        Self {
            item_code: "item_code".to_string(),
            warehouse: "warehouse".to_string(),
            barcode: "barcode".to_string(),
            serial_no: "serial_no".to_string(),
            batch_no: "batch_no".to_string(),
            uom: "uom".to_string(),
            qty: "qty".to_string(),
        }
    }
}
impl RowFields {
    /// All bound column names, in declaration order.
    pub fn names(&self) -> [&str; 7] {
        [&self.item_code, &self.warehouse, &self.barcode, &self.serial_no, &self.batch_no, &self.uom, &self.qty]
    }
}

/// Settings for one scanner, usually the `[scanner]` section of the config file.
///
/// Every field has a default, so a partial section (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Form field the barcode reader types into.
    pub scan_field: String,
    /// Form field holding the currently selected warehouse.
    pub warehouse_field: String,
    /// Child table that scans accumulate into.
    pub table: String,
    /// Names of the row fields scans read and write.
    pub fields: RowFields,
    /// How a scan becomes an item code: remote lookup or local heuristic.
    pub strategy: Strategy,
    /// Minimum scan length, and how many leading characters identify the item.
    pub rules: ScanRules,
    /// Prepended to heuristic item codes.
    pub item_tag: String,
    /// Remote method name for the lookup strategy.
    pub lookup_method: String,
    /// Lookups slower than this fail the scan.
    pub lookup_timeout_ms: u64,
    /// Sound played after a successful scan. Silent when unset.
    pub success_sound: Option<String>,
    /// Sound played after a failed scan. Silent when unset.
    pub fail_sound: Option<String>,
    /// How long alerts stay on screen.
    pub alert_duration_ms: u64,
}
impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_field: "scan_serial_no".to_string(),
            warehouse_field: "current_warehouse".to_string(),
            table: "items".to_string(),
            fields: RowFields::default(),
            strategy: Strategy::default(),
            rules: ScanRules::default(),
            item_tag: DEFAULT_ITEM_TAG.to_string(),
            lookup_method: DEFAULT_LOOKUP_METHOD.to_string(),
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64,
            success_sound: None,
            fail_sound: Some(DEFAULT_FAIL_SOUND.to_string()),
            alert_duration_ms: DEFAULT_ALERT_DURATION.as_millis() as u64,
        }
    }
}
impl ScannerConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert_duration_ms)
    }

    /// Builds the resolver selected by [`strategy`](Self::strategy).
    ///
    /// The lookup strategy needs a lookup service; the heuristic strategy
    /// ignores it.
    pub fn resolver(&self, lookup: Option<LookupHandle>) -> Result<ResolverHandle> {
        let resolver: ResolverHandle = match (self.strategy, lookup) {
            (Strategy::Heuristic, _) => {
                Arc::new(HeuristicResolver::new(self.rules).with_item_tag(self.item_tag.as_str()))
            },
            (Strategy::Lookup, Some(lookup)) => {
                Arc::new(LookupResolver::new(self.rules, lookup).with_timeout(self.lookup_timeout()))
            },
            (Strategy::Lookup, None) => exn::bail!(ErrorKind::Config("lookup strategy requires a lookup service")),
        };
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscan_resolve::lookup::MockLookup;

    #[test]
    fn test_defaults_match_form_conventions() {
        let config = ScannerConfig::default();
        assert_eq!(config.scan_field, "scan_serial_no");
        assert_eq!(config.warehouse_field, "current_warehouse");
        assert_eq!(config.table, "items");
        assert_eq!(config.rules, ScanRules { min_length: 20, prefix_length: 6 });
        assert_eq!(config.fail_sound.as_deref(), Some("error"));
        assert_eq!(config.alert_duration(), Duration::from_secs(3));
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{"strategy":"heuristic","fields":{"qty":"picked_qty"}}"#).unwrap();
        assert_eq!(config.strategy, Strategy::Heuristic);
        assert_eq!(config.fields.qty, "picked_qty");
        assert_eq!(config.fields.item_code, "item_code");
    }

    #[test]
    fn test_resolver_selection() {
        let heuristic = ScannerConfig { strategy: Strategy::Heuristic, ..ScannerConfig::default() };
        assert_eq!(heuristic.resolver(None).unwrap().name(), "heuristic");

        let lookup = ScannerConfig::default();
        assert_eq!(lookup.resolver(Some(Arc::new(MockLookup::default()))).unwrap().name(), "lookup");
        let err = lookup.resolver(None).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Config(_)));
    }
}
