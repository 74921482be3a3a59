//! Choosing the row a scan lands in.

use crate::config::RowFields;
use stockscan_form::Row;
use stockscan_resolve::ResolvedItem;

/// Where a resolved scan should go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowMatch<'a> {
    /// The serial number is already recorded against this item; reject.
    Duplicate(&'a Row),
    /// Same item, same warehouse: add to this row.
    Existing(&'a Row),
    /// No matching row, but this row has no item yet: fill it in.
    Blank(&'a Row),
    /// Nothing fits: append a new row.
    Create,
}

/// Picks the row a scan should be applied to.
///
/// Rules, in order:
/// 1. A row with the same item code whose accumulated serial numbers already
///    contain the scanned serial (substring match) makes the scan a
///    duplicate.
/// 2. Otherwise the first row with the same item code *and* the same
///    warehouse as currently selected is reused.
/// 3. Otherwise the first row without an item code is reused.
/// 4. Otherwise a new row is needed.
///
/// Values are compared in their string form, so an item code stored as the
/// number `1001` matches a scan resolved to `"1001"`. Only a missing, `null`
/// or empty item code makes a row blank. An unset warehouse only matches rows
/// without a warehouse.
pub fn find_row<'a>(
    rows: &'a [Row],
    item: &ResolvedItem,
    warehouse: Option<&str>,
    fields: &RowFields,
) -> RowMatch<'a> {
    let same_item = |row: &Row| row.as_string(&fields.item_code).as_deref() == Some(item.item_code.as_str());

    let duplicate = rows.iter().find(|&row| {
        same_item(row)
            && row.as_string(&fields.serial_no).is_some_and(|serials| serials.contains(item.serial_no.as_str()))
    });
    if let Some(row) = duplicate {
        return RowMatch::Duplicate(row);
    }
    if let Some(row) =
        rows.iter().find(|&row| same_item(row) && row.as_string(&fields.warehouse).as_deref() == warehouse)
    {
        return RowMatch::Existing(row);
    }
    match rows.iter().find(|row| row.is_blank(&fields.item_code)) {
        Some(row) => RowMatch::Blank(row),
        None => RowMatch::Create,
    }
}
