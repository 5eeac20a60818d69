//! Directory schema bootstrap.
//!
//! The directory has exactly one table and no upgrade path: a fresh database
//! gets the table, a current one is left alone, a newer one is rejected.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version` after bootstrap.
pub const SCHEMA_VERSION: u32 = 1;

const PERSONS_DDL: &str = "CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName TEXT NOT NULL,
    lastName TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL,
    nationalId TEXT NOT NULL UNIQUE
);";

/// Creates the directory schema when missing.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            supported: SCHEMA_VERSION,
        });
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(PERSONS_DDL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;
    Ok(())
}

/// Reads `PRAGMA user_version` from the connection.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
