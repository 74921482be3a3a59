//! Scan-to-row reconciliation for stock item tables.
//!
//! A [`Scanner`] is bound to one form: the field a barcode reader types
//! into, the warehouse selector, and the child table that accumulates
//! scanned items. For each scan it
//!
//! 1. resolves the raw text to an item with a [`ScanResolver`](stockscan_resolve::ScanResolver),
//! 2. picks the row the scan belongs to ([`find_row`]),
//! 3. computes and applies the row's new values ([`mutation`]),
//! 4. reports the outcome through a [`FeedbackSink`].
//!
//! Serial numbers are unique per item: scanning one that is already recorded
//! against the same item is rejected without touching the table.

mod config;
pub mod error;
mod feedback;
mod matcher;
mod mutator;
mod scanner;

pub use crate::config::{DEFAULT_ALERT_DURATION, DEFAULT_FAIL_SOUND, DEFAULT_LOOKUP_METHOD, RowFields, ScannerConfig, Strategy};
#[cfg(any(test, feature = "mock"))]
pub use crate::feedback::{Feedback, RecordingFeedback};
pub use crate::feedback::{Alert, FeedbackHandle, FeedbackSink, Indicator, TracingFeedback};
pub use crate::matcher::{RowMatch, find_row};
pub use crate::mutator::{SERIAL_SEPARATOR, mutation};
pub use crate::scanner::{Form, ScanOutcome, Scanner};
