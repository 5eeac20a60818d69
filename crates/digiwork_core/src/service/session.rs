//! Per-view session state for the Excel tool screens.
//!
//! # Responsibility
//! - Track what the user picked so far (files, destination, counts).
//! - Turn picker events into state changes plus a prompt for the view.
//!
//! # Invariants
//! - State lives in the struct owned by the view controller; handlers take
//!   `&mut self` and never reach for shared globals.
//! - `MergeWizard` never holds more files than the requested count.

use crate::error::ErrorKind;
use crate::repo::person_repo::PersonRepository;
use crate::service::import_service::{ImportError, ImportOutcome, PersonImportService};
use crate::service::merge_service::{merge_files, MergeError, MergeOutcome};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Session-level failure for the import and merge screens.
#[derive(Debug)]
pub enum WizardError {
    /// Import requested before a file was picked.
    NoFileSelected,
    /// The workbook count is not a number.
    InvalidCount(String),
    /// The workbook count is below 1.
    CountBelowOne,
    /// Files were picked before the workbook count was set.
    CountNotSet,
    /// The requested number of workbooks is already selected.
    TooManyFiles { expected: usize },
    /// Merge requested before all workbooks were picked.
    MissingFiles { selected: usize, expected: usize },
    /// Merge requested before a destination directory was picked.
    NoDestination,
    Import(ImportError),
    Merge(MergeError),
}

impl WizardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Import(err) => err.kind(),
            Self::Merge(err) => err.kind(),
            _ => ErrorKind::Validation,
        }
    }
}

impl Display for WizardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFileSelected => write!(f, "please select an Excel file first"),
            Self::InvalidCount(input) => {
                write!(f, "please enter a valid number (got `{input}`)")
            }
            Self::CountBelowOne => write!(f, "the number of workbooks must be at least 1"),
            Self::CountNotSet => write!(f, "choose how many workbooks to merge first"),
            Self::TooManyFiles { expected } => {
                write!(f, "all {expected} workbook(s) are already selected")
            }
            Self::MissingFiles { selected, expected } => write!(
                f,
                "please select {expected} workbook(s); {selected} selected so far"
            ),
            Self::NoDestination => write!(f, "please select a destination folder"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Merge(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WizardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Import(err) => Some(err),
            Self::Merge(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ImportError> for WizardError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<MergeError> for WizardError {
    fn from(value: MergeError) -> Self {
        Self::Merge(value)
    }
}

/// State of the "load Excel into the directory" screen.
#[derive(Debug, Clone, Default)]
pub struct ImportSession {
    selected_file: Option<PathBuf>,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    /// Records the picker result; `None` means the dialog was cancelled.
    ///
    /// A cancelled dialog keeps the previous selection.
    pub fn select_file(&mut self, picked: Option<PathBuf>) -> String {
        match picked {
            Some(path) => {
                let message = format!("Excel file selected: {}", path.display());
                self.selected_file = Some(path);
                message
            }
            None => "No file selected.".to_string(),
        }
    }

    /// Imports the selected file through `service`.
    pub fn run<R: PersonRepository>(
        &self,
        service: &PersonImportService<R>,
    ) -> Result<ImportOutcome, WizardError> {
        let path = self
            .selected_file
            .as_deref()
            .ok_or(WizardError::NoFileSelected)?;
        Ok(service.import_file(path)?)
    }
}

/// State of the "merge workbooks" screen.
#[derive(Debug, Clone, Default)]
pub struct MergeWizard {
    expected_files: Option<usize>,
    files: Vec<PathBuf>,
    destination: Option<PathBuf>,
}

impl MergeWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_files(&self) -> Option<usize> {
        self.expected_files
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Parses the number of workbooks to merge and restarts file selection.
    pub fn set_sheet_count(&mut self, input: &str) -> Result<String, WizardError> {
        let trimmed = input.trim();
        let count = trimmed
            .parse::<i64>()
            .map_err(|_| WizardError::InvalidCount(trimmed.to_string()))?;
        if count < 1 {
            return Err(WizardError::CountBelowOne);
        }
        let count = usize::try_from(count).map_err(|_| WizardError::InvalidCount(trimmed.to_string()))?;

        self.expected_files = Some(count);
        self.files.clear();
        Ok(format!("Select {count} file(s)."))
    }

    /// Adds one picked workbook; returns the progress prompt.
    pub fn add_file(&mut self, path: PathBuf) -> Result<String, WizardError> {
        let expected = self.expected_files.ok_or(WizardError::CountNotSet)?;
        if self.files.len() >= expected {
            return Err(WizardError::TooManyFiles { expected });
        }
        self.files.push(path);
        Ok(format!("Files selected: {}/{expected}", self.files.len()))
    }

    /// Whether the view should keep the "select file" button enabled.
    pub fn accepts_more_files(&self) -> bool {
        self.expected_files
            .is_some_and(|expected| self.files.len() < expected)
    }

    pub fn set_destination(&mut self, dir: PathBuf) -> String {
        let message = format!("Destination folder selected: {}", dir.display());
        self.destination = Some(dir);
        message
    }

    /// Back to the initial "how many workbooks" prompt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// All workbooks and the destination are picked.
    pub fn is_ready(&self) -> bool {
        self.expected_files == Some(self.files.len()) && self.destination.is_some()
    }

    /// Prompt shown for the current state.
    pub fn status_message(&self) -> String {
        match self.expected_files {
            None => "Choose how many workbooks to merge.".to_string(),
            Some(expected) if self.files.len() < expected => {
                format!("Files selected: {}/{expected}", self.files.len())
            }
            Some(_) if self.destination.is_none() => "Select a destination folder.".to_string(),
            Some(_) => "Ready to merge.".to_string(),
        }
    }

    /// Runs the merge with the collected inputs.
    pub fn merge(&self) -> Result<MergeOutcome, WizardError> {
        let expected = self.expected_files.ok_or(WizardError::CountNotSet)?;
        if self.files.len() < expected {
            return Err(WizardError::MissingFiles {
                selected: self.files.len(),
                expected,
            });
        }
        let destination = self
            .destination
            .as_deref()
            .ok_or(WizardError::NoDestination)?;
        Ok(merge_files(&self.files, destination)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportSession, MergeWizard, WizardError};
    use crate::error::ErrorKind;
    use std::path::PathBuf;

    #[test]
    fn sheet_count_rejects_non_numbers_and_zero() {
        let mut wizard = MergeWizard::new();
        let err = wizard.set_sheet_count("two").unwrap_err();
        assert!(matches!(err, WizardError::InvalidCount(ref input) if input == "two"));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(
            wizard.set_sheet_count("0"),
            Err(WizardError::CountBelowOne)
        ));
        assert_eq!(wizard.expected_files(), None);
    }

    #[test]
    fn add_file_stops_at_requested_count() {
        let mut wizard = MergeWizard::new();
        assert!(matches!(
            wizard.add_file(PathBuf::from("a.xlsx")),
            Err(WizardError::CountNotSet)
        ));

        wizard.set_sheet_count(" 2 ").unwrap();
        assert_eq!(wizard.add_file(PathBuf::from("a.xlsx")).unwrap(), "Files selected: 1/2");
        assert!(wizard.accepts_more_files());
        wizard.add_file(PathBuf::from("b.xlsx")).unwrap();
        assert!(!wizard.accepts_more_files());
        assert!(matches!(
            wizard.add_file(PathBuf::from("c.xlsx")),
            Err(WizardError::TooManyFiles { expected: 2 })
        ));
        assert_eq!(wizard.files().len(), 2);
    }

    #[test]
    fn merge_requires_files_and_destination() {
        let mut wizard = MergeWizard::new();
        wizard.set_sheet_count("2").unwrap();
        wizard.add_file(PathBuf::from("a.xlsx")).unwrap();
        assert!(matches!(
            wizard.merge(),
            Err(WizardError::MissingFiles {
                selected: 1,
                expected: 2
            })
        ));

        wizard.add_file(PathBuf::from("b.xlsx")).unwrap();
        assert_eq!(wizard.status_message(), "Select a destination folder.");
        assert!(matches!(wizard.merge(), Err(WizardError::NoDestination)));

        wizard.set_destination(PathBuf::from("out"));
        assert!(wizard.is_ready());
        assert_eq!(wizard.status_message(), "Ready to merge.");
    }

    #[test]
    fn reset_returns_to_initial_prompt() {
        let mut wizard = MergeWizard::new();
        wizard.set_sheet_count("1").unwrap();
        wizard.add_file(PathBuf::from("a.xlsx")).unwrap();
        wizard.set_destination(PathBuf::from("out"));
        wizard.reset();
        assert_eq!(wizard.expected_files(), None);
        assert!(wizard.files().is_empty());
        assert!(wizard.destination().is_none());
        assert_eq!(wizard.status_message(), "Choose how many workbooks to merge.");
    }

    #[test]
    fn import_session_keeps_selection_when_dialog_is_cancelled() {
        let mut session = ImportSession::new();
        session.select_file(Some(PathBuf::from("people.xlsx")));
        assert_eq!(session.select_file(None), "No file selected.");
        assert_eq!(
            session.selected_file().map(|path| path.to_path_buf()),
            Some(PathBuf::from("people.xlsx"))
        );
    }
}
