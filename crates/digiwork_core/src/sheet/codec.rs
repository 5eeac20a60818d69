//! `.xlsx` load/save for `TabularSheet`.
//!
//! # Responsibility
//! - Read the first worksheet of a workbook into memory (header + rows).
//! - Write one sheet to a new workbook without an index column.
//!
//! # Invariants
//! - The file handle is released before `load_sheet` returns.
//! - Whole-number floats load as `CellValue::Int`, so a saved sheet
//!   re-loads with the same cell values.

use super::{float_as_integer, CellValue, TabularSheet};
use calamine::{open_workbook, Data, Reader, Xlsx};
use log::{debug, error};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Spreadsheet codec failure.
#[derive(Debug)]
pub enum SheetError {
    /// The workbook could not be opened or parsed.
    Read {
        path: PathBuf,
        source: calamine::XlsxError,
    },
    /// The workbook contains no worksheet.
    NoWorksheet { path: PathBuf },
    /// The workbook could not be produced or saved.
    Write { path: PathBuf, source: XlsxError },
}

impl SheetError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::NoWorksheet { path } | Self::Write { path, .. } => {
                path
            }
        }
    }
}

impl Display for SheetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read spreadsheet `{}`: {source}", path.display())
            }
            Self::NoWorksheet { path } => {
                write!(f, "spreadsheet `{}` has no worksheet", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write spreadsheet `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SheetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::NoWorksheet { .. } => None,
            Self::Write { source, .. } => Some(source),
        }
    }
}

/// Loads the first worksheet of an `.xlsx` file.
///
/// The first used row becomes the header; blank header cells are named
/// `Unnamed: <column index>`, counting from column A.
pub fn load_sheet(path: impl AsRef<Path>) -> Result<TabularSheet, SheetError> {
    let path = path.as_ref();
    let read_error = |source| SheetError::Read {
        path: path.to_path_buf(),
        source,
    };

    let range = {
        let mut workbook: Xlsx<_> = open_workbook(path).map_err(read_error)?;
        match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(read_error)?,
            None => {
                return Err(SheetError::NoWorksheet {
                    path: path.to_path_buf(),
                })
            }
        }
    };

    // The range starts at the first used cell; columns before it are blank
    // but still part of the sheet.
    let leading_columns = range.start().map_or(0, |(_, column)| column as usize);
    let anchored = |row: &[Data]| {
        std::iter::repeat(CellValue::Empty)
            .take(leading_columns)
            .chain(row.iter().map(cell_from_data))
            .collect::<Vec<_>>()
    };

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => anchored(header)
            .into_iter()
            .enumerate()
            .map(|(index, cell)| match cell {
                CellValue::Empty => format!("Unnamed: {index}"),
                other => other.as_text(),
            })
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };
    let data_rows = rows.map(anchored).collect::<Vec<_>>();

    debug!(
        "event=sheet_load module=sheet status=ok path={} rows={} columns={}",
        path.display(),
        data_rows.len(),
        columns.len()
    );
    Ok(TabularSheet::new(columns, data_rows))
}

/// Writes `sheet` as the only worksheet of a new `.xlsx` file at `path`.
///
/// Overwrites an existing file.
pub fn save_sheet(sheet: &TabularSheet, path: impl AsRef<Path>) -> Result<(), SheetError> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let result = write_sheet(workbook.add_worksheet(), sheet).and_then(|()| workbook.save(path));

    result.map_err(|source| {
        error!(
            "event=sheet_save module=sheet status=error path={} error_code=sheet_write_failed error={}",
            path.display(),
            source
        );
        SheetError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &TabularSheet) -> Result<(), XlsxError> {
    let date_format = Format::new().set_num_format(DATE_TIME_FORMAT);

    for (index, name) in sheet.columns().iter().enumerate() {
        worksheet.write_string(0, column_number(index)?, name)?;
    }

    for (row_index, cells) in sheet.rows().iter().enumerate() {
        let row = row_number(row_index + 1)?;
        for (index, cell) in cells.iter().enumerate() {
            let column = column_number(index)?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    worksheet.write_string(row, column, text)?;
                }
                CellValue::Int(value) => {
                    worksheet.write_number(row, column, *value as f64)?;
                }
                CellValue::Float(value) => {
                    worksheet.write_number(row, column, *value)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row, column, *value)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(row, column, *serial, &date_format)?;
                }
            }
        }
    }
    Ok(())
}

fn row_number(index: usize) -> Result<u32, XlsxError> {
    u32::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_number(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) if text.is_empty() => CellValue::Empty,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::Text(text.clone())
        }
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) => match float_as_integer(*value) {
            Some(whole) => CellValue::Int(whole),
            None => CellValue::Float(*value),
        },
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::DateTime(value.as_f64()),
    }
}
