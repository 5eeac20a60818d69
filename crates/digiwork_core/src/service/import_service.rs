//! Spreadsheet-to-directory import use-case.
//!
//! # Responsibility
//! - Load one workbook, check the required columns, map rows to persons.
//! - Insert all mapped rows through the repository as one batch.
//!
//! # Invariants
//! - Header matching ignores case and surrounding whitespace.
//! - Columns other than the six required ones are ignored.
//! - An import inserts every row or none (the batch is atomic).
//! - Logs carry counts and paths only, never person field values.

use crate::error::ErrorKind;
use crate::model::person::{NewPerson, PersonId};
use crate::repo::person_repo::{PersonRepository, RepoError};
use crate::sheet::codec::{load_sheet, SheetError};
use crate::sheet::TabularSheet;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Header names the import requires, in the directory's own spelling.
pub const REQUIRED_COLUMNS: [&str; 6] = ["name", "lastname", "phone", "email", "age", "nationalId"];

/// Spreadsheet rows start at 2: row 1 holds the header.
const FIRST_DATA_ROW: usize = 2;

/// Import failure.
#[derive(Debug)]
pub enum ImportError {
    /// One or more required headers are absent.
    MissingColumns { missing: Vec<String> },
    /// The `age` cell of a row is not a whole number.
    InvalidAge { row: usize, value: String },
    /// The store rejected the row at spreadsheet row `row`, or the whole
    /// batch when `row` is `None`.
    Persistence { row: Option<usize>, source: RepoError },
    /// The workbook could not be loaded.
    Sheet(SheetError),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumns { .. } | Self::InvalidAge { .. } => ErrorKind::Validation,
            Self::Persistence { .. } => ErrorKind::Persistence,
            Self::Sheet(_) => ErrorKind::Import,
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumns { missing } => write!(
                f,
                "the spreadsheet must contain the columns: {} (missing: {})",
                REQUIRED_COLUMNS.join(", "),
                missing.join(", ")
            ),
            Self::InvalidAge { row, value } => {
                write!(f, "row {row}: age `{value}` is not a whole number")
            }
            Self::Persistence {
                row: Some(row),
                source,
            } => write!(f, "row {row} could not be saved: {source}"),
            Self::Persistence { row: None, source } => {
                write!(f, "the rows could not be saved: {source}")
            }
            Self::Sheet(err) => write!(f, "import failed: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence { source, .. } => Some(source),
            Self::Sheet(err) => Some(err),
            Self::MissingColumns { .. } | Self::InvalidAge { .. } => None,
        }
    }
}

impl From<SheetError> for ImportError {
    fn from(value: SheetError) -> Self {
        Self::Sheet(value)
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub source: PathBuf,
    /// Ids of the inserted persons, in spreadsheet row order.
    pub person_ids: Vec<PersonId>,
}

impl ImportOutcome {
    pub fn rows_loaded(&self) -> usize {
        self.person_ids.len()
    }

    /// Human-readable confirmation for the UI.
    pub fn message(&self) -> String {
        format!(
            "Loaded {} row(s) from {} into the directory.",
            self.rows_loaded(),
            self.source.display()
        )
    }
}

/// Import service over a person repository.
pub struct PersonImportService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonImportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Imports every row of the workbook at `path`.
    ///
    /// # Errors
    /// - `ImportError::Sheet` when the file cannot be loaded.
    /// - `ImportError::MissingColumns` / `InvalidAge` before anything is written.
    /// - `ImportError::Persistence` when the store rejects a row; no row is kept.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportOutcome, ImportError> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!(
            "event=person_import module=import status=start path={}",
            path.display()
        );

        let result = load_sheet(path)
            .map_err(ImportError::from)
            .and_then(|sheet| self.import_sheet(sheet));

        match result {
            Ok(person_ids) => {
                info!(
                    "event=person_import module=import status=ok path={} rows={} duration_ms={}",
                    path.display(),
                    person_ids.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(ImportOutcome {
                    source: path.to_path_buf(),
                    person_ids,
                })
            }
            Err(err) => {
                error!(
                    "event=person_import module=import status=error path={} duration_ms={} error_kind={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err.kind()
                );
                Err(err)
            }
        }
    }

    /// Imports an already loaded sheet.
    pub fn import_sheet(&self, sheet: TabularSheet) -> Result<Vec<PersonId>, ImportError> {
        let persons = persons_from_sheet(sheet)?;
        self.repo
            .insert_batch(&persons)
            .map_err(|err| ImportError::Persistence {
                row: err.index.map(|index| index + FIRST_DATA_ROW),
                source: err.source,
            })
    }
}

/// Maps sheet rows to insert payloads after checking the required headers.
pub fn persons_from_sheet(mut sheet: TabularSheet) -> Result<Vec<NewPerson>, ImportError> {
    sheet.normalize_columns();
    let index = sheet.column_index();

    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !index.contains(column))
        .map(|column| column.to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns { missing });
    }

    // Presence was checked above.
    let [name, lastname, phone, email, age, national_id] =
        REQUIRED_COLUMNS.map(|column| index.position(column).unwrap_or_default());

    sheet
        .rows()
        .iter()
        .enumerate()
        .map(|(offset, row)| -> Result<NewPerson, ImportError> {
            let age_cell = &row[age];
            let age = age_cell.as_integer().ok_or_else(|| ImportError::InvalidAge {
                row: offset + FIRST_DATA_ROW,
                value: age_cell.as_text(),
            })?;
            Ok(NewPerson {
                first_name: row[name].as_text(),
                last_name: row[lastname].as_text(),
                phone: row[phone].as_text(),
                email: row[email].as_text(),
                age,
                national_id: row[national_id].as_text(),
            })
        })
        .collect()
}
