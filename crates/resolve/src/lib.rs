//! Resolution of raw scanned text to stock items.
//!
//! A scan is first checked against the [`ScanRules`] (anything shorter than
//! a serial number is rejected before any work is done), then handed to a
//! [`ScanResolver`] strategy:
//!
//! - [`HeuristicResolver`]: the item code is derived from the scan itself.
//! - [`LookupResolver`]: the item code comes from an external
//!   [`ItemLookup`](lookup::ItemLookup), bounded by a timeout.
//!
//! Either way the result is a [`ResolvedItem`] whose serial number is the
//! full scanned text.

pub mod error;
mod input;
pub mod lookup;
mod models;
mod resolver;

pub use crate::input::{ITEM_PREFIX_LENGTH, MIN_SCAN_LENGTH, ScanInput, ScanRules};
pub use crate::models::{LookupRecord, ResolvedItem};
pub use crate::resolver::{
    DEFAULT_ITEM_TAG, DEFAULT_LOOKUP_TIMEOUT, HeuristicResolver, LookupResolver, ResolverHandle, ScanResolver,
};
