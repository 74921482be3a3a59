//! Turning a resolved scan into field assignments for one row.

use crate::config::RowFields;
use serde_json::Value;
use stockscan_form::{Fields, Row};
use stockscan_resolve::ResolvedItem;

/// Separator between accumulated serial numbers.
pub const SERIAL_SEPARATOR: &str = "\n";

/// Computes every assignment a scan makes to `row`, to be applied in a single
/// field-set.
///
/// - item code and warehouse are always written (the warehouse is whatever
///   is selected *now*, `null` when nothing is),
/// - quantity becomes the current quantity (0 when absent) plus `increment`,
/// - the scanned serial is appended to the accumulated serials on a new line,
/// - batch, UOM and barcode are written only when the scan produced a value
///   and `has_field` says the row has a column for it.
///
/// Serial numbers are likewise only written when the row has a serial column.
pub fn mutation(
    row: &Row,
    item: &ResolvedItem,
    warehouse: Option<&str>,
    increment: f64,
    fields: &RowFields,
    has_field: impl Fn(&str) -> bool,
) -> Fields {
    let mut assignments = Fields::new();
    assignments.insert(fields.item_code.clone(), Value::from(item.item_code.as_str()));
    assignments.insert(fields.warehouse.clone(), warehouse.map_or(Value::Null, Value::from));
    let qty = row.number(&fields.qty).unwrap_or(0.0) + increment;
    assignments.insert(fields.qty.clone(), quantity(qty));

    if has_field(&fields.serial_no) {
        let serials = match row.as_string(&fields.serial_no) {
            Some(existing) => format!("{existing}{SERIAL_SEPARATOR}{}", item.serial_no),
            None => item.serial_no.clone(),
        };
        assignments.insert(fields.serial_no.clone(), Value::from(serials));
    }
    for (field, value) in [(&fields.batch_no, &item.batch_no), (&fields.uom, &item.uom), (&fields.barcode, &item.barcode)] {
        if let Some(value) = value
            && has_field(field)
        {
            assignments.insert(field.clone(), Value::from(value.as_str()));
        }
    }
    assignments
}

/// Whole quantities are stored as integers, so a table round-tripped through
/// JSON reads `"qty": 2` rather than `"qty": 2.0`.
fn quantity(qty: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if qty.fract() == 0.0 && qty.abs() < MAX_EXACT { Value::from(qty as i64) } else { Value::from(qty) }
}
