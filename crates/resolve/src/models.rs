//! Resolution models.

use crate::input::ScanInput;
use serde::{Deserialize, Serialize};

/// The item a scan resolved to.
///
/// `item_code` is never empty; `serial_no` is always the full scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub item_code: String,
    pub serial_no: String,
    pub barcode: Option<String>,
    pub batch_no: Option<String>,
    pub uom: Option<String>,
}
impl ResolvedItem {
    pub fn new(item_code: impl Into<String>, serial_no: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            serial_no: serial_no.into(),
            barcode: None,
            batch_no: None,
            uom: None,
        }
    }

    pub fn with_batch_no(mut self, batch_no: impl Into<String>) -> Self {
        self.batch_no = Some(batch_no.into());
        self
    }

    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }
}

/// A record returned by an item lookup service.
///
/// Every field is optional: the service only fills in what the search value
/// matched (`barcode` when a barcode was found, `batch_no` for a batch,
/// `uom` when the barcode's UOM differs from the item default). Unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupRecord {
    pub item_code: Option<String>,
    #[serde(alias = "bar_code")]
    pub barcode: Option<String>,
    pub batch_no: Option<String>,
    pub serial_no: Option<String>,
    pub uom: Option<String>,
}
impl LookupRecord {
    pub fn item(item_code: impl Into<String>) -> Self {
        Self { item_code: Some(item_code.into()), ..Self::default() }
    }

    /// Whether the record carries no information at all.
    pub fn is_empty(&self) -> bool {
        [&self.item_code, &self.barcode, &self.batch_no, &self.serial_no, &self.uom]
            .into_iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    /// Turns the record into a [`ResolvedItem`] for the given scan.
    ///
    /// The service only ever sees the truncated search key, so whatever
    /// serial number it returned is replaced by the full scanned text.
    /// Returns `None` when the record has no item code.
    pub fn into_resolved(self, input: &ScanInput) -> Option<ResolvedItem> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        Some(ResolvedItem {
            item_code: non_empty(self.item_code)?,
            serial_no: input.as_str().to_string(),
            barcode: non_empty(self.barcode),
            batch_no: non_empty(self.batch_no),
            uom: non_empty(self.uom),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScanRules;

    const SCAN: &str = "AB123456XXXXXXXXXXXXXXXX";

    #[test]
    fn test_deserialize_accepts_bar_code_alias() {
        let record: LookupRecord = serde_json::from_str(r#"{"item_code":"HORSESHOE","bar_code":"123456"}"#).unwrap();
        assert_eq!(record.barcode.as_deref(), Some("123456"));
    }

    #[test]
    fn test_deserialize_ignores_unknown_and_null() {
        let record: LookupRecord =
            serde_json::from_str(r#"{"item_code":"HORSESHOE","uom":null,"has_serial_no":1}"#).unwrap();
        assert_eq!(record, LookupRecord::item("HORSESHOE"));
    }

    #[test]
    fn test_is_empty() {
        assert!(LookupRecord::default().is_empty());
        assert!(LookupRecord { uom: Some(String::new()), ..LookupRecord::default() }.is_empty());
        assert!(!LookupRecord::item("X").is_empty());
    }

    #[test]
    fn test_into_resolved_overwrites_serial() {
        let input = ScanRules::default().validate(SCAN).unwrap();
        let record = LookupRecord {
            serial_no: Some("AB1234".to_string()),
            batch_no: Some("LOT12".to_string()),
            uom: Some(String::new()),
            ..LookupRecord::item("HORSESHOE")
        };
        let item = record.into_resolved(&input).unwrap();
        assert_eq!(item.item_code, "HORSESHOE");
        assert_eq!(item.serial_no, SCAN);
        assert_eq!(item.batch_no.as_deref(), Some("LOT12"));
        assert_eq!(item.uom, None);
    }

    #[test]
    fn test_into_resolved_requires_item_code() {
        let input = ScanRules::default().validate(SCAN).unwrap();
        let record = LookupRecord { batch_no: Some("LOT12".to_string()), ..LookupRecord::default() };
        assert_eq!(record.into_resolved(&input), None);
        assert_eq!(LookupRecord::item("").into_resolved(&input), None);
    }
}
