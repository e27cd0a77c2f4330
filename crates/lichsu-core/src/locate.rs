//! Dict-bearing column detection

use crate::model::{Cell, RawSheet};

/// Find the first column whose first non-empty value looks like a serialized
/// key-value object, i.e. contains both `{` and `}`.
///
/// Only the first non-empty value per column is sampled, and the first
/// matching column wins. This is a heuristic: a stray brace pair in an
/// unrelated text column would be misidentified. Expected inputs carry
/// exactly one such column per sheet.
pub fn dict_column(sheet: &RawSheet) -> Option<usize> {
    (0..sheet.columns().len()).find(|&col| {
        sheet
            .rows()
            .iter()
            .map(|row| &row[col])
            .find(|cell| !cell.is_empty())
            .map_or(false, |cell| match cell {
                Cell::Text(s) => s.contains('{') && s.contains('}'),
                _ => false,
            })
    })
}
