use digiwork_core::db::schema::{schema_version, SCHEMA_VERSION};
use digiwork_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_persons_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    let columns = conn
        .prepare("SELECT name FROM pragma_table_info('persons') ORDER BY cid;")
        .unwrap()
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(
        columns,
        vec!["id", "firstName", "lastName", "phone", "email", "age", "nationalId"]
    );
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("personas.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO persons (firstName, lastName, phone, email, age, nationalId)
             VALUES ('Ana', 'Rojas', '1', 'a@example.com', 20, 'V-1');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), SCHEMA_VERSION);
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}
