//! Core domain logic for DigiWork Solutions.
//!
//! Covers the person directory store, the spreadsheet importer and the
//! workbook merger. UI shells call into the services; nothing here renders.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sheet;

pub use error::ErrorKind;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::person::{NewPerson, PersonId, PersonRecord, PersonValidationError};
pub use repo::person_repo::{
    BatchInsertError, PersonListQuery, PersonRepository, RepoError, RepoResult,
    SqlitePersonRepository,
};
pub use service::directory_service::{DirectoryService, PersonPage};
pub use service::import_service::{
    ImportError, ImportOutcome, PersonImportService, REQUIRED_COLUMNS,
};
pub use service::merge_service::{merge_files, MergeError, MergeOutcome, MERGED_FILE_NAME};
pub use service::session::{ImportSession, MergeWizard, WizardError};
pub use sheet::codec::{load_sheet, save_sheet, SheetError};
pub use sheet::{CellValue, ColumnIndex, TabularSheet};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
