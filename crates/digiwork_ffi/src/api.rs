//! FFI use-case API for the desktop shell.
//!
//! # Responsibility
//! - Expose directory listing, Excel import and workbook merge to the UI.
//! - Turn every core failure into a response envelope with a kind label.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One directory connection is opened on first use and reused afterwards.

use crate::config::app_config;
use digiwork_core::db::open_db;
use digiwork_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, merge_files,
    ping as ping_inner, DirectoryService, ErrorKind, PersonImportService, PersonRecord,
    SqlitePersonRepository,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static DIRECTORY_CONN: OnceLock<Mutex<Connection>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Reconfiguration with a different level or directory returns an error.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Outcome envelope for import and merge actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// `validation|read|write|persistence|import`; `None` on success.
    pub error_kind: Option<String>,
    /// Human-readable result shown in the view's status line.
    pub message: String,
    /// Rows imported or rows in the merged workbook.
    pub rows: Option<u64>,
    /// Merged workbook location (merge only).
    pub output_path: Option<String>,
}

impl ActionResponse {
    fn success(message: impl Into<String>, rows: usize, output_path: Option<String>) -> Self {
        Self {
            ok: true,
            error_kind: None,
            message: message.into(),
            rows: u64::try_from(rows).ok(),
            output_path,
        }
    }

    fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_kind: Some(kind.label().to_string()),
            message: message.into(),
            rows: None,
            output_path: None,
        }
    }
}

/// One row of the directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryItem {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub age: i64,
    pub national_id: String,
    /// "first last", as shown in the directory list.
    pub display_name: String,
}

impl From<PersonRecord> for DirectoryItem {
    fn from(record: PersonRecord) -> Self {
        Self {
            display_name: record.full_name(),
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            phone: record.phone,
            email: record.email,
            age: record.age,
            national_id: record.national_id,
        }
    }
}

/// Page envelope for the directory view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPageResponse {
    pub items: Vec<DirectoryItem>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    /// Empty on success, error text otherwise.
    pub message: String,
}

/// Lists one page of the person directory.
///
/// # FFI contract
/// - `page` is 1-based; 0 is treated as 1.
/// - `page_size` defaults to 10 and is clamped to 100.
/// - Never panics; failures return an empty page with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn directory_list_page(page: u32, page_size: Option<u32>) -> DirectoryPageResponse {
    let result = with_directory_conn(|conn| {
        DirectoryService::new(SqlitePersonRepository::new(conn))
            .list_page(page, page_size)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(listing) => DirectoryPageResponse {
            items: listing.items.into_iter().map(DirectoryItem::from).collect(),
            page: listing.page,
            page_size: listing.page_size,
            total_items: listing.total_items,
            total_pages: listing.total_pages,
            message: String::new(),
        },
        Err(message) => DirectoryPageResponse {
            items: Vec::new(),
            page: page.max(1),
            page_size: 0,
            total_items: 0,
            total_pages: 1,
            message: format!("directory_list_page failed: {message}"),
        },
    }
}

/// Loads every row of an Excel workbook into the directory.
///
/// # FFI contract
/// - `path` comes from the shell's file picker.
/// - All rows are stored or none are.
/// - Never panics; returns the imported row count on success.
#[flutter_rust_bridge::frb(sync)]
pub fn directory_import_excel(path: String) -> ActionResponse {
    let path = path.trim().to_string();
    if path.is_empty() {
        return ActionResponse::failure(ErrorKind::Validation, "Please select an Excel file.");
    }

    let result = with_directory_conn(|conn| {
        let service = PersonImportService::new(SqlitePersonRepository::new(conn));
        Ok(service.import_file(&path))
    });

    match result {
        Ok(Ok(outcome)) => ActionResponse::success(outcome.message(), outcome.rows_loaded(), None),
        Ok(Err(err)) => ActionResponse::failure(err.kind(), format!("Error: {err}")),
        Err(message) => import_unavailable(&message),
    }
}

/// The directory store could not be reached at all; no row was rejected.
fn import_unavailable(message: &str) -> ActionResponse {
    ActionResponse::failure(
        ErrorKind::Import,
        format!("directory_import_excel failed: {message}"),
    )
}

/// Merges workbooks column-wise into `<destination_dir>/archivo_combinado.xlsx`.
///
/// # FFI contract
/// - `paths` keep the order the user picked them in.
/// - Never panics; returns the output path on success.
#[flutter_rust_bridge::frb(sync)]
pub fn excel_merge(paths: Vec<String>, destination_dir: String) -> ActionResponse {
    let inputs = paths.iter().map(PathBuf::from).collect::<Vec<_>>();
    match merge_files(&inputs, destination_dir.trim()) {
        Ok(outcome) => {
            let output_path = outcome.output_path.display().to_string();
            ActionResponse::success(outcome.message(), outcome.rows, Some(output_path))
        }
        Err(err) => ActionResponse::failure(err.kind(), format!("Error: {err}")),
    }
}

fn with_directory_conn<T>(
    f: impl FnOnce(&Connection) -> Result<T, String>,
) -> Result<T, String> {
    let conn = match DIRECTORY_CONN.get() {
        Some(conn) => conn,
        None => {
            let db_path = &app_config().db_path;
            let opened =
                open_db(db_path).map_err(|err| format!("directory DB open failed: {err}"))?;
            // A concurrent first call may win the race; its connection is kept.
            let _ = DIRECTORY_CONN.set(Mutex::new(opened));
            DIRECTORY_CONN
                .get()
                .ok_or_else(|| "directory DB unavailable".to_string())?
        }
    };

    let guard = conn.lock().map_err(|_| {
        warn!("event=directory_conn module=ffi status=error error_code=lock_poisoned");
        "directory DB lock poisoned".to_string()
    })?;
    f(&guard)
}
