//! Read-only item table.
//!
//! This module provides a table implementation that wraps another table and
//! prevents writes from reaching it, while still answering as if they had
//! succeeded. Used for dry runs.

use crate::error::{ErrorKind, Result};
use crate::row::{Fields, Row};
use crate::table::{RowStore, TableHandle};
use async_trait::async_trait;

/// Read-only item table.
///
/// Wraps another table and silently drops all writes, logging an
/// [`info event`](tracing::Event). Appends and field assignments return the
/// row the inner table *would* have produced, so a scan can run to
/// completion and report what it would have done.
#[derive(Clone)]
pub struct ReadOnlyTable {
    inner: TableHandle,
}
impl ReadOnlyTable {
    pub fn new(inner: TableHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl RowStore for ReadOnlyTable {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn has_field(&self, field: &str) -> bool {
        self.inner.has_field(field)
    }

    async fn rows(&self) -> Result<Vec<Row>> {
        self.inner.rows().await
    }

    async fn append(&self) -> Result<Row> {
        let idx = self.inner.rows().await?.len() + 1;
        tracing::info!(table = %self.name(), idx, "Skipping append during read-only mode");
        Ok(Row::new(idx))
    }

    async fn set_fields(&self, idx: usize, fields: Fields) -> Result<Row> {
        if let Some(unknown) = fields.keys().find(|key| !self.inner.has_field(key)) {
            exn::bail!(ErrorKind::UnknownField(unknown.clone()));
        }
        let rows = self.inner.rows().await?;
        // Rows "appended" during this run only exist here, one past the end.
        let next = rows.len() + 1;
        let mut row = match rows.into_iter().find(|row| row.idx == idx) {
            Some(row) => row,
            None if idx == next => Row::new(idx),
            None => exn::bail!(ErrorKind::RowNotFound(idx)),
        };
        tracing::info!(table = %self.name(), idx, fields = fields.len(), "Skipping field update during read-only mode");
        row.apply(fields);
        Ok(row)
    }

    async fn refresh(&self) -> Result<()> {
        self.inner.refresh().await
    }
}
