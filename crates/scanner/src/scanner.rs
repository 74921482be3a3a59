use crate::config::ScannerConfig;
use crate::error::{ErrorKind, Result};
use crate::feedback::{Emitter, FeedbackHandle, TracingFeedback};
use crate::matcher::{RowMatch, find_row};
use crate::mutator::mutation;
use exn::ResultExt;
use std::sync::Arc;
use stockscan_form::{FieldHandle, HookHandle, Row, TableHandle};
use stockscan_resolve::ResolverHandle;
use tokio::sync::Mutex;
use tracing::instrument;

/// The parts of the host form a scanner works on.
#[derive(Clone)]
pub struct Form {
    /// Field the barcode reader types into.
    pub input: FieldHandle,
    /// Warehouse selector; its value is stamped onto every row a scan touches.
    pub warehouse: FieldHandle,
    pub table: TableHandle,
    /// Run after a new row is appended, before the scan writes to it.
    pub hook: Option<HookHandle>,
}

/// What a successful scan did to the table.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The input field was empty; nothing happened.
    Ignored,
    /// The item was added to a row that had no item before (either newly
    /// appended or a reused blank row).
    Created(Row),
    /// An existing row for the same item and warehouse was incremented.
    Updated { row: Row, qty_added: f64 },
}

/// Handles scans for one form.
///
/// Each call to [`process_scan`](Self::process_scan) reads the input field,
/// resolves what was scanned, reconciles it into the item table and tells
/// the user what happened. Scans on one scanner never overlap: a second call
/// waits for the first to finish.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stockscan_form::table::MemoryTable;
/// use stockscan_form::{FormField, MemoryField, RowStore};
/// use stockscan_scanner::{Form, ScanOutcome, Scanner, ScannerConfig, Strategy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ScannerConfig { strategy: Strategy::Heuristic, ..ScannerConfig::default() };
/// let input = Arc::new(MemoryField::new("scan_serial_no"));
/// let table = Arc::new(MemoryTable::new("items", config.fields.names()));
/// let form = Form {
///     input: input.clone(),
///     warehouse: Arc::new(MemoryField::new("current_warehouse").with_value("Stores")),
///     table: table.clone(),
///     hook: None,
/// };
/// let scanner = Scanner::new(config.clone(), config.resolver(None)?, form);
///
/// input.set_value("AB123456XXXXXXXXXXXXXXXX").await?;
/// let outcome = scanner.process_scan().await?;
/// assert!(matches!(outcome, ScanOutcome::Created(row) if row.idx == 1));
/// assert_eq!(table.rows().await?[0].text("item_code"), Some("XXAB1234"));
/// # Ok(())
/// # }
/// ```
pub struct Scanner {
    config: ScannerConfig,
    resolver: ResolverHandle,
    form: Form,
    feedback: Emitter,
    busy: Mutex<()>,
}
impl Scanner {
    pub fn new(config: ScannerConfig, resolver: ResolverHandle, form: Form) -> Self {
        let feedback = Emitter::new(Arc::new(TracingFeedback), &config);
        Self { config, resolver, form, feedback, busy: Mutex::new(()) }
    }

    /// Send alerts and sounds somewhere other than the log.
    pub fn with_feedback(mut self, sink: FeedbackHandle) -> Self {
        self.feedback = Emitter::new(sink, &self.config);
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Process whatever is in the input field, adding one unit.
    pub async fn process_scan(&self) -> Result<ScanOutcome> {
        self.process_scan_with(1.0).await
    }

    /// Process whatever is in the input field, adding `increment` units.
    ///
    /// The input field is cleared as soon as it has been read, and the table
    /// is refreshed whatever the outcome. Every outcome except
    /// [`ScanOutcome::Ignored`] produces exactly one alert.
    ///
    /// # Errors
    /// The error kind tells which alert the user was shown; the table has not
    /// been modified unless the kind is [`ErrorKind::Table`].
    #[instrument(skip_all, fields(resolver = self.resolver.name(), increment = increment))]
    pub async fn process_scan_with(&self, increment: f64) -> Result<ScanOutcome> {
        let _busy = self.busy.lock().await;

        let raw = self.form.input.value().await;
        if let Err(err) = self.form.input.set_value("").await {
            tracing::warn!(field = self.form.input.name(), error = ?err, "Failed to clear scan input");
        }
        if raw.is_empty() {
            tracing::debug!("Empty scan input; ignoring");
            return Ok(ScanOutcome::Ignored);
        }

        let result = self.reconcile(&raw, increment).await;
        self.clean_up().await;
        match &result {
            Ok(outcome) => self.feedback.scanned(outcome),
            Err(err) => {
                let kind: &ErrorKind = err;
                tracing::warn!(%kind, error = ?err, "Scan rejected");
                self.feedback.failed(kind);
            },
        }
        result
    }

    async fn reconcile(&self, raw: &str, increment: f64) -> Result<ScanOutcome> {
        if !increment.is_finite() || increment <= 0.0 {
            exn::bail!(ErrorKind::InvalidIncrement(increment));
        }
        let item = self.resolver.resolve(raw).await.map_err(ErrorKind::resolution)?;
        tracing::debug!(item_code = item.item_code, serial_no = item.serial_no, "Scan resolved");

        let fields = &self.config.fields;
        let table = &self.form.table;
        let rows = table.rows().await.or_raise(|| ErrorKind::Table)?;
        let warehouse = self.warehouse().await;

        let (row, created) = match find_row(&rows, &item, warehouse.as_deref(), fields) {
            RowMatch::Duplicate(row) => {
                tracing::info!(row = row.idx, serial_no = item.serial_no, "Serial number already recorded");
                exn::bail!(ErrorKind::DuplicateSerial(item.serial_no));
            },
            RowMatch::Existing(row) => (row.clone(), false),
            RowMatch::Blank(row) => (row.clone(), true),
            RowMatch::Create => (self.append_row().await?, true),
        };

        // Stamp the selection as it is now, not as it was when matching.
        let warehouse = self.warehouse().await;
        let assignments = mutation(&row, &item, warehouse.as_deref(), increment, fields, |field| table.has_field(field));
        let row = table.set_fields(row.idx, assignments).await.or_raise(|| ErrorKind::Table)?;

        if created {
            tracing::info!(row = row.idx, item_code = item.item_code, "Item added");
            Ok(ScanOutcome::Created(row))
        } else {
            tracing::info!(row = row.idx, item_code = item.item_code, qty_added = increment, "Quantity increased");
            Ok(ScanOutcome::Updated { row, qty_added: increment })
        }
    }

    /// Appends a row and runs the row-add hook on it, returning the row as
    /// the hook left it.
    async fn append_row(&self) -> Result<Row> {
        let table = &self.form.table;
        let row = table.append().await.or_raise(|| ErrorKind::Table)?;
        let Some(hook) = &self.form.hook else {
            return Ok(row);
        };
        hook.row_added(table.as_ref(), &row).await.or_raise(|| ErrorKind::Table)?;
        let rows = table.rows().await.or_raise(|| ErrorKind::Table)?;
        // A read-only table never holds the appended row.
        Ok(rows.into_iter().find(|candidate| candidate.idx == row.idx).unwrap_or(row))
    }

    async fn warehouse(&self) -> Option<String> {
        Some(self.form.warehouse.value().await).filter(|value| !value.is_empty())
    }

    /// The input field was already cleared when it was read, so a scan
    /// typed while this one was processing is left alone.
    async fn clean_up(&self) {
        if let Err(err) = self.form.table.refresh().await {
            tracing::warn!(table = self.form.table.name(), error = ?err, "Failed to refresh item table");
        }
    }
}
