//! Workbook merge use-case.
//!
//! # Responsibility
//! - Load every input workbook, join them by row position, save the result.
//!
//! # Invariants
//! - Nothing is written unless every input loaded.
//! - The output always lands at `<destination>/archivo_combinado.xlsx`.
//!
//! # See also
//! - `sheet::merge` for the join rules.

use crate::error::ErrorKind;
use crate::sheet::codec::{load_sheet, save_sheet, SheetError};
use crate::sheet::merge::{duplicate_columns, merge_sheets};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File name of the merged workbook inside the destination directory.
pub const MERGED_FILE_NAME: &str = "archivo_combinado.xlsx";

/// Merge failure.
#[derive(Debug)]
pub enum MergeError {
    /// No input workbook was supplied.
    NoInputs,
    /// Input number `position` (1-based) could not be loaded.
    Read { position: usize, source: SheetError },
    /// The merged workbook could not be saved.
    Write(SheetError),
}

impl MergeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoInputs => ErrorKind::Validation,
            Self::Read { .. } => ErrorKind::Read,
            Self::Write(_) => ErrorKind::Write,
        }
    }
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoInputs => write!(f, "at least one spreadsheet is required to merge"),
            Self::Read { position, source } => write!(
                f,
                "error reading file {} (input {position}): {source}",
                source.path().display()
            ),
            Self::Write(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MergeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoInputs => None,
            Self::Read { source, .. } => Some(source),
            Self::Write(err) => Some(err),
        }
    }
}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub output_path: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
}

impl MergeOutcome {
    /// Human-readable confirmation for the UI.
    pub fn message(&self) -> String {
        format!("Merged file saved as '{}'.", self.output_path.display())
    }
}

/// Returns where a merge into `destination_dir` writes its output.
pub fn merged_output_path(destination_dir: impl AsRef<Path>) -> PathBuf {
    destination_dir.as_ref().join(MERGED_FILE_NAME)
}

/// Merges `inputs` column-wise and writes the result into `destination_dir`.
///
/// # Errors
/// - `MergeError::NoInputs` before any I/O when `inputs` is empty.
/// - `MergeError::Read` naming the first input that fails to load.
/// - `MergeError::Write` when the output file cannot be created.
pub fn merge_files<P: AsRef<Path>>(
    inputs: &[P],
    destination_dir: impl AsRef<Path>,
) -> Result<MergeOutcome, MergeError> {
    if inputs.is_empty() {
        return Err(MergeError::NoInputs);
    }

    let started_at = Instant::now();
    let output_path = merged_output_path(destination_dir);
    info!(
        "event=sheet_merge module=merge status=start inputs={} output={}",
        inputs.len(),
        output_path.display()
    );

    let result = merge_into(inputs, &output_path);
    match &result {
        Ok(outcome) => info!(
            "event=sheet_merge module=merge status=ok rows={} columns={} duration_ms={}",
            outcome.rows,
            outcome.columns.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=sheet_merge module=merge status=error duration_ms={} error_kind={} error={}",
            started_at.elapsed().as_millis(),
            err.kind(),
            err
        ),
    }
    result
}

fn merge_into<P: AsRef<Path>>(inputs: &[P], output_path: &Path) -> Result<MergeOutcome, MergeError> {
    let sheets = inputs
        .iter()
        .enumerate()
        .map(|(index, path)| {
            load_sheet(path).map_err(|source| MergeError::Read {
                position: index + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let merged = merge_sheets(sheets).ok_or(MergeError::NoInputs)?;
    let duplicates = duplicate_columns(&merged);
    if !duplicates.is_empty() {
        warn!(
            "event=sheet_merge module=merge status=warn error_code=duplicate_columns columns={}",
            duplicates.join(",")
        );
    }
    save_sheet(&merged, output_path).map_err(MergeError::Write)?;

    Ok(MergeOutcome {
        output_path: output_path.to_path_buf(),
        rows: merged.row_count(),
        columns: merged.columns().to_vec(),
    })
}
