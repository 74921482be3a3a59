//! Validation of raw scanned text.

use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// Shortest input accepted as a serial number scan.
pub const MIN_SCAN_LENGTH: usize = 20;
/// Number of leading characters that identify the item.
pub const ITEM_PREFIX_LENGTH: usize = 6;

/// Length rules applied to every scan before resolution.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRules {
    pub min_length: usize,
    pub prefix_length: usize,
}
impl Default for ScanRules {
    fn default() -> Self {
        Self { min_length: MIN_SCAN_LENGTH, prefix_length: ITEM_PREFIX_LENGTH }
    }
}
impl ScanRules {
    /// Accepts raw scanned text as a [`ScanInput`], or rejects it with
    /// [`ErrorKind::InputTooShort`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stockscan_resolve::ScanRules;
    ///
    /// let rules = ScanRules::default();
    /// assert!(rules.validate("AB123456XXXXXXXXXXXXXXXX").is_ok());
    /// assert!(rules.validate("AB1234").is_err());
    /// ```
    pub fn validate(&self, raw: &str) -> Result<ScanInput> {
        let length = raw.chars().count();
        if length < self.min_length {
            exn::bail!(ErrorKind::InputTooShort { length, minimum: self.min_length });
        }
        Ok(ScanInput { raw: raw.to_string(), prefix_length: self.prefix_length })
    }
}

/// Scanned text that passed the length rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInput {
    raw: String,
    prefix_length: usize,
}
impl ScanInput {
    /// The full scanned text. This is what gets recorded as the serial number.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The leading characters identifying the item (the lookup search key).
    pub fn prefix(&self) -> &str {
        match self.raw.char_indices().nth(self.prefix_length) {
            Some((end, _)) => &self.raw[..end],
            None => &self.raw,
        }
    }
}
