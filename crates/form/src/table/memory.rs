//! In-memory item table.

use crate::error::{ErrorKind, Result};
use crate::row::{Fields, Row};
use crate::table::RowStore;
use async_trait::async_trait;
use exn::ResultExt;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory item table.
///
/// Rows are stored in a `Vec` behind a [`RwLock`], so all trait methods can
/// operate on `&self` without external synchronisation. Used by the
/// command-line tool (loaded from and saved to a JSON array of row objects)
/// and by tests that need a [`RowStore`] without a host form.
///
/// # Examples
///
/// ```
/// use stockscan_form::table::{MemoryTable, RowStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = MemoryTable::new("items", ["item_code", "warehouse", "qty"])
///     .with_json(r#"[{"item_code": "ITM1", "qty": 2}]"#)?;
/// assert_eq!(table.rows().await?.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MemoryTable {
    name: String,
    schema: BTreeSet<String>,
    rows: RwLock<Vec<Row>>,
    refreshes: AtomicUsize,
}

impl MemoryTable {
    /// Create an empty table whose rows declare the given fields.
    pub fn new(name: impl Into<String>, schema: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into_iter().map(Into::into).collect(),
            rows: RwLock::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// Replace the table contents with the given rows, numbered in order.
    ///
    /// Fields outside the schema are kept as-is: the host owns the document
    /// and may carry columns the scanner knows nothing about.
    pub fn with_rows(self, rows: impl IntoIterator<Item = Fields>) -> Self {
        let rows = rows.into_iter().enumerate().map(|(i, fields)| Row::with_fields(i + 1, fields)).collect();
        Self { rows: RwLock::new(rows), ..self }
    }

    /// Replace the table contents with rows parsed from a JSON array of
    /// objects.
    pub fn with_json(self, json: &str) -> Result<Self> {
        let rows: Vec<Fields> = serde_json::from_str(json).or_raise(|| ErrorKind::InvalidData("rows"))?;
        Ok(self.with_rows(rows))
    }

    /// Serialize the current rows as a pretty-printed JSON array, in `idx`
    /// order.
    pub async fn to_json(&self) -> Result<String> {
        let rows: Vec<Value> = self.rows.read().await.iter().map(|row| Value::Object(row.fields.clone())).collect();
        serde_json::to_string_pretty(&rows).or_raise(|| ErrorKind::InvalidData("rows"))
    }

    /// Number of times the table has been asked to re-render.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RowStore for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_field(&self, field: &str) -> bool {
        self.schema.contains(field)
    }

    async fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.rows.read().await.clone())
    }

    async fn append(&self) -> Result<Row> {
        let mut rows = self.rows.write().await;
        let row = Row::new(rows.len() + 1);
        rows.push(row.clone());
        tracing::debug!(table = %self.name, idx = row.idx, "Appended row");
        Ok(row)
    }

    async fn set_fields(&self, idx: usize, fields: Fields) -> Result<Row> {
        if let Some(unknown) = fields.keys().find(|key| !self.schema.contains(key.as_str())) {
            exn::bail!(ErrorKind::UnknownField(unknown.clone()));
        }
        let mut rows = self.rows.write().await;
        let row = idx
            .checked_sub(1)
            .and_then(|i| rows.get_mut(i))
            .ok_or_else(|| exn::Exn::from(ErrorKind::RowNotFound(idx)))?;
        row.apply(fields);
        Ok(row.clone())
    }

    async fn refresh(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(table = %self.name, "Refreshed table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("test rows must be JSON objects"),
        }
    }

    fn table() -> MemoryTable {
        MemoryTable::new("items", ["item_code", "warehouse", "serial_no", "qty"])
    }

    #[tokio::test]
    async fn test_append_numbers_rows() {
        let table = table().with_rows([fields(json!({ "item_code": "ITM1" }))]);
        let row = table.append().await.unwrap();
        assert_eq!(row.idx, 2);
        assert!(row.fields.is_empty());
        assert_eq!(table.rows().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_fields_merges() {
        let table = table().with_rows([fields(json!({ "item_code": "ITM1", "qty": 1 }))]);
        let row = table.set_fields(1, fields(json!({ "qty": 2.0 }))).await.unwrap();
        assert_eq!(row.text("item_code"), Some("ITM1"));
        assert_eq!(row.number("qty"), Some(2.0));
        assert_eq!(table.rows().await.unwrap()[0], row);
    }

    #[tokio::test]
    async fn test_set_fields_missing_row() {
        let table = table();
        let err = table.set_fields(1, Fields::new()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RowNotFound(1)));
        let err = table.set_fields(0, Fields::new()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RowNotFound(0)));
    }

    #[tokio::test]
    async fn test_set_fields_rejects_unknown_field_without_writing() {
        let table = table().with_rows([fields(json!({ "item_code": "ITM1" }))]);
        let err = table.set_fields(1, fields(json!({ "qty": 1, "batch_no": "LOT1" }))).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownField(f) if f == "batch_no"));
        assert_eq!(table.rows().await.unwrap()[0].get("qty"), None);
    }

    #[tokio::test]
    async fn test_json_keeps_row_order() {
        let json = r#"[{"item_code":"B","extra":true},{"item_code":"A"}]"#;
        let table = table().with_json(json).unwrap();
        let rows = table.rows().await.unwrap();
        assert_eq!(rows[0].idx, 1);
        assert_eq!(rows[0].text("item_code"), Some("B"));
        assert_eq!(rows[1].text("item_code"), Some("A"));

        let reloaded = self::table().with_json(&table.to_json().await.unwrap()).unwrap();
        assert_eq!(reloaded.rows().await.unwrap(), rows);
    }

    #[test]
    fn test_rejects_non_array_json() {
        let err = table().with_json(r#"{"item_code":"A"}"#).err().unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_counts_refreshes() {
        let table = table();
        table.refresh().await.unwrap();
        table.refresh().await.unwrap();
        assert_eq!(table.refresh_count(), 2);
    }
}
