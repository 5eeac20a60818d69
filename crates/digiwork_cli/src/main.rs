//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `digiwork_core` linkage and directory bootstrap without the UI.
//! - Keep output deterministic for quick local sanity checks.

use digiwork_core::db::open_db_in_memory;
use digiwork_core::{DirectoryService, SqlitePersonRepository, REQUIRED_COLUMNS};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("digiwork_core ping={}", digiwork_core::ping());
    println!("digiwork_core version={}", digiwork_core::core_version());
    println!("import columns={}", REQUIRED_COLUMNS.join(","));

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("directory bootstrap failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    match DirectoryService::new(SqlitePersonRepository::new(&conn)).list_page(1, None) {
        Ok(page) => {
            println!("directory bootstrap=ok persons={}", page.total_items);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("directory listing failed: {err}");
            ExitCode::FAILURE
        }
    }
}
