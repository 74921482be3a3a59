//! Rows of a host child table.

use serde_json::Value;
use std::borrow::Cow;

/// A set of field assignments, keyed by the host's field name.
///
/// This is also the storage format of a row: host documents are JSON-shaped,
/// so a row is just an ordered JSON object.
pub type Fields = serde_json::Map<String, Value>;

/// One entry of a host child table.
///
/// `idx` is the 1-based position of the row in its table, the same number a
/// user sees in the grid ("Row #3"). Rows are never removed by this
/// workspace, so an index stays valid for the lifetime of the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub idx: usize,
    pub fields: Fields,
}
impl Row {
    /// Create an empty row at the given position.
    pub fn new(idx: usize) -> Self {
        Self { idx, fields: Fields::new() }
    }

    /// Create a row at the given position with pre-populated fields.
    pub fn with_fields(idx: usize, fields: Fields) -> Self {
        Self { idx, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field as text, treating missing, `null` and empty strings
    /// alike as "no value".
    ///
    /// Non-string values (numbers, booleans) are not coerced: item codes and
    /// warehouses are always strings in the host documents.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the field in its string form: strings as they are, numbers
    /// and booleans formatted. Missing, `null` and empty values read as
    /// `None`, as do arrays and objects.
    ///
    /// Host tables are loose about types (an item code may be stored as
    /// `1001` or `"1001"`), so comparisons go through this.
    pub fn as_string(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(field)? {
            Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    /// Whether the field holds no value at all: missing, `null` or `""`.
    pub fn is_blank(&self, field: &str) -> bool {
        match self.fields.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Returns the field as a number.
    ///
    /// Hosts are inconsistent about quantities: they arrive as JSON numbers,
    /// as numeric strings from form inputs, or not at all. Anything that
    /// can't be read as a finite number is treated as absent.
    pub fn number(&self, field: &str) -> Option<f64> {
        let n = match self.fields.get(field)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Merges the given assignments into this row, overwriting existing
    /// values field by field.
    pub fn apply(&mut self, fields: Fields) {
        for (key, value) in fields {
            self.fields.insert(key, value);
        }
    }
}
