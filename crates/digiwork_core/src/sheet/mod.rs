//! In-memory tabular sheets and the `.xlsx` codec around them.
//!
//! # Responsibility
//! - Hold one worksheet as named columns plus position-ordered rows.
//! - Provide name-based column lookup without rescanning headers per row.
//!
//! # Invariants
//! - Every row has exactly `columns.len()` cells.
//! - Row order is the order rows appear in the source worksheet.

pub mod codec;
pub mod merge;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// One spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date/time (days since 1899-12-30).
    DateTime(f64),
}

impl CellValue {
    /// Renders the cell as text the way a user reads it in the sheet.
    ///
    /// Integers never carry a trailing `.0`.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Interprets the cell as a whole number.
    ///
    /// Accepts integer cells, integral floats and integer-parsable text.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) => float_as_integer(*value),
            Self::Text(text) => text.trim().parse::<i64>().ok(),
            Self::Empty | Self::Bool(_) | Self::DateTime(_) => None,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{serial}"),
            },
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Converts an Excel serial (1900 date system) to a calendar date-time.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let millis = (serial * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() > 1.0e15 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(Duration::milliseconds(millis as i64))
}

pub(crate) fn float_as_integer(value: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; stay strictly inside the range.
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e18 {
        Some(value as i64)
    } else {
        None
    }
}

/// Trims and lower-cases a column header for lookup.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A rectangular worksheet: header names plus data rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularSheet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularSheet {
    /// Builds a sheet, padding short rows with `Empty` and cutting long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Keeps only the first `row_count` rows.
    pub fn truncate_rows(&mut self, row_count: usize) {
        self.rows.truncate(row_count);
    }

    /// Replaces every header with its normalized form.
    pub fn normalize_columns(&mut self) {
        for column in &mut self.columns {
            *column = normalize_column_name(column);
        }
    }

    pub fn rename_column(&mut self, index: usize, name: impl Into<String>) {
        if let Some(column) = self.columns.get_mut(index) {
            *column = name.into();
        }
    }

    /// Appends `other`'s columns to the right, pairing rows by position.
    ///
    /// Both sheets must have the same row count.
    pub(crate) fn append_columns(&mut self, other: TabularSheet) {
        debug_assert_eq!(self.rows.len(), other.rows.len());
        self.columns.extend(other.columns);
        for (row, extra) in self.rows.iter_mut().zip(other.rows) {
            row.extend(extra);
        }
    }

    /// Builds the normalized-name lookup for this sheet.
    pub fn column_index(&self) -> ColumnIndex {
        ColumnIndex::build(&self.columns)
    }
}

/// Normalized column name to column position, built once per sheet.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// First occurrence wins when two headers normalize to the same name.
    pub fn build(columns: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            positions
                .entry(normalize_column_name(column))
                .or_insert(index);
        }
        Self { positions }
    }

    /// Looks up a column; `name` is normalized before matching.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize_column_name(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_column_name, CellValue, ColumnIndex, TabularSheet};

    #[test]
    fn date_time_cells_render_as_calendar_dates() {
        assert_eq!(CellValue::DateTime(45000.5).as_text(), "2023-03-15 12:00:00");
        assert_eq!(CellValue::DateTime(44927.0).as_text(), "2023-01-01 00:00:00");
        assert_eq!(CellValue::DateTime(f64::NAN).as_text(), "NaN");
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_column_name("  NationalId \t"), "nationalid");
    }

    #[test]
    fn new_pads_short_rows() {
        let sheet = TabularSheet::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![CellValue::Int(1)]],
        );
        assert_eq!(sheet.cell(0, 1), Some(&CellValue::Empty));
    }

    #[test]
    fn column_index_matches_case_insensitively_first_wins() {
        let columns = vec![" Email".to_string(), "EMAIL".to_string(), "Age".to_string()];
        let index = ColumnIndex::build(&columns);
        assert_eq!(index.position("email"), Some(0));
        assert_eq!(index.position(" AGE "), Some(2));
        assert!(!index.contains("phone"));
    }

    #[test]
    fn cell_integer_and_text_rendering() {
        assert_eq!(CellValue::Float(42.0).as_integer(), Some(42));
        assert_eq!(CellValue::Float(4.5).as_integer(), None);
        assert_eq!(CellValue::Text(" 19 ".to_string()).as_integer(), Some(19));
        assert_eq!(CellValue::Text("nineteen".to_string()).as_integer(), None);
        assert_eq!(CellValue::Int(1002003).as_text(), "1002003");
        assert_eq!(CellValue::Empty.as_text(), "");
    }
}
