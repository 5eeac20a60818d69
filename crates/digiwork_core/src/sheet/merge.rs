//! Position-aligned column join of several sheets.
//!
//! # Invariants
//! - The result has `min(row_count)` rows; longer sheets lose their tail.
//! - Columns keep input order: first sheet, then each later sheet in turn.
//! - A later sheet's column that collides with an accumulated column is
//!   renamed `<name>_df<k>`, `k` being the sheet's 1-based input position.

use super::TabularSheet;
use std::collections::HashSet;

/// Suffix appended to a colliding column from the `position`-th input (1-based).
pub fn collision_name(column: &str, position: usize) -> String {
    format!("{column}_df{position}")
}

/// Joins `sheets` side by side, row `i` pairing with row `i`.
///
/// Returns `None` when `sheets` is empty.
pub fn merge_sheets(sheets: Vec<TabularSheet>) -> Option<TabularSheet> {
    let min_rows = sheets.iter().map(TabularSheet::row_count).min()?;

    let mut sheets = sheets.into_iter();
    let mut merged = sheets.next()?;
    merged.truncate_rows(min_rows);

    for (offset, mut sheet) in sheets.enumerate() {
        // `offset` 0 is the second input.
        let position = offset + 2;
        sheet.truncate_rows(min_rows);

        let existing: HashSet<&str> = merged.columns().iter().map(String::as_str).collect();
        let renames = sheet
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| existing.contains(column.as_str()))
            .map(|(index, column)| (index, collision_name(column, position)))
            .collect::<Vec<_>>();
        for (index, name) in renames {
            sheet.rename_column(index, name);
        }

        merged.append_columns(sheet);
    }

    Some(merged)
}

/// Column names that occur more than once in `sheet`, in first-repeat order.
///
/// Renamed columns are not checked again, so a rename can land on a name an
/// earlier input already carries.
pub fn duplicate_columns(sheet: &TabularSheet) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for column in sheet.columns() {
        if !seen.insert(column.as_str()) && !duplicates.contains(column) {
            duplicates.push(column.clone());
        }
    }
    duplicates
}
