//! Child item tables and their row-add hooks.
//!
//! This module defines the [`RowStore`] trait, the only view the scanner has
//! of the host document's item table, and the [`RowHook`] trait for the
//! host's "row added" trigger.

mod hook;
mod memory;
mod ro;

pub use self::hook::DefaultsHook;
pub use self::memory::MemoryTable;
pub use self::ro::ReadOnlyTable;
use crate::error::Result;
use crate::row::{Fields, Row};
use async_trait::async_trait;
use std::sync::Arc;

pub type TableHandle = Arc<dyn RowStore + Send + Sync>;
pub type HookHandle = Arc<dyn RowHook + Send + Sync>;

/// An ordered, append-only collection of rows owned by the host form.
///
/// Implementations own persistence and re-rendering. The scanner only ever
/// reads the rows, appends blank rows, and applies field assignments to a
/// single row at a time.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stockscan_form::table::{MemoryTable, RowStore};
/// use stockscan_form::Fields;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = MemoryTable::new("items", ["item_code", "qty"]);
/// let row = table.append().await?;
///
/// let mut fields = Fields::new();
/// fields.insert("item_code".into(), json!("ITM1"));
/// fields.insert("qty".into(), json!(1.0));
/// let row = table.set_fields(row.idx, fields).await?;
/// assert_eq!(row.text("item_code"), Some("ITM1"));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Name of the table field on the host document (e.g. `items`).
    fn name(&self) -> &str;

    /// Whether the row schema declares the given field.
    ///
    /// Optional attributes (batch, UOM, barcode) are only written when the
    /// schema has somewhere to put them.
    fn has_field(&self, field: &str) -> bool;

    /// Snapshot of all rows, in `idx` order.
    async fn rows(&self) -> Result<Vec<Row>>;

    /// Append a blank row to the end of the table and return it.
    async fn append(&self) -> Result<Row>;

    /// Apply all assignments to the row at `idx` as one operation, returning
    /// the updated row.
    ///
    /// Returns [`RowNotFound`](crate::error::ErrorKind::RowNotFound) if there
    /// is no such row, and [`UnknownField`](crate::error::ErrorKind::UnknownField)
    /// if the schema does not declare one of the fields (nothing is written
    /// in that case).
    async fn set_fields(&self, idx: usize, fields: Fields) -> Result<Row>;

    /// Ask the host to re-render the table.
    async fn refresh(&self) -> Result<()>;
}

/// Host callback run right after a row has been appended, before the scanner
/// writes its own values.
///
/// Typically used to populate defaults; the scanner's assignments are applied
/// afterwards and win on any field both touch.
#[async_trait]
pub trait RowHook: Send + Sync {
    async fn row_added(&self, table: &dyn RowStore, row: &Row) -> Result<()>;
}
