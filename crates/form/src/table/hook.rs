use crate::error::Result;
use crate::row::{Fields, Row};
use crate::table::{RowHook, RowStore};
use async_trait::async_trait;

/// Row-add hook that fills freshly appended rows with fixed default values.
///
/// Stands in for the host's `<table>_add` trigger. Defaults for fields the
/// table doesn't declare are dropped rather than failing the scan.
pub struct DefaultsHook {
    defaults: Fields,
}
impl DefaultsHook {
    pub fn new(defaults: Fields) -> Self {
        Self { defaults }
    }
}

#[async_trait]
impl RowHook for DefaultsHook {
    async fn row_added(&self, table: &dyn RowStore, row: &Row) -> Result<()> {
        let defaults: Fields =
            self.defaults.iter().filter(|(key, _)| table.has_field(key)).map(|(k, v)| (k.clone(), v.clone())).collect();
        if defaults.is_empty() {
            return Ok(());
        }
        tracing::debug!(table = %table.name(), idx = row.idx, fields = defaults.len(), "Applying row defaults");
        table.set_fields(row.idx, defaults).await?;
        Ok(())
    }
}
