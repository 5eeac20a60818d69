//! Person repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert and list APIs over the `persons` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Batch inserts are all-or-nothing.
//! - Listing order is `id ASC`, i.e. insertion order.

use crate::db::DbError;
use crate::model::person::{NewPerson, PersonId, PersonRecord, PersonValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    firstName,
    lastName,
    phone,
    email,
    age,
    nationalId
FROM persons";

const PERSON_INSERT_SQL: &str = "INSERT INTO persons (
    firstName,
    lastName,
    phone,
    email,
    age,
    nationalId
) VALUES (?1, ?2, ?3, ?4, ?5, ?6);";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    /// Another record already holds this national id.
    DuplicateNationalId(String),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateNationalId(value) => {
                write!(f, "a person with national id `{value}` already exists")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateNationalId(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Failure of an atomic batch insert.
#[derive(Debug)]
pub struct BatchInsertError {
    /// 0-based position of the rejected record; `None` when the transaction
    /// itself could not be opened or committed.
    pub index: Option<usize>,
    pub source: RepoError,
}

impl Display for BatchInsertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(index) => write!(f, "record {index} rejected: {}", self.source),
            None => write!(f, "batch rejected: {}", self.source),
        }
    }
}

impl Error for BatchInsertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Paging options for listing persons.
#[derive(Debug, Clone, Default)]
pub struct PersonListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for the person directory.
pub trait PersonRepository {
    fn insert_person(&self, person: &NewPerson) -> RepoResult<PersonId>;
    /// Inserts every record or none of them.
    fn insert_batch(&self, persons: &[NewPerson]) -> Result<Vec<PersonId>, BatchInsertError>;
    fn list_persons(&self, query: &PersonListQuery) -> RepoResult<Vec<PersonRecord>>;
    fn count_persons(&self) -> RepoResult<u64>;

    fn list_all(&self) -> RepoResult<Vec<PersonRecord>> {
        self.list_persons(&PersonListQuery::default())
    }
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_person(&self, person: &NewPerson) -> RepoResult<PersonId> {
        insert_on(self.conn, person)
    }

    fn insert_batch(&self, persons: &[NewPerson]) -> Result<Vec<PersonId>, BatchInsertError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(|err| BatchInsertError {
                index: None,
                source: err.into(),
            })?;

        let mut ids = Vec::with_capacity(persons.len());
        for (index, person) in persons.iter().enumerate() {
            // Dropping `tx` on the error path rolls back earlier inserts.
            let id = insert_on(&tx, person).map_err(|source| BatchInsertError {
                index: Some(index),
                source,
            })?;
            ids.push(id);
        }

        tx.commit().map_err(|err| BatchInsertError {
            index: None,
            source: err.into(),
        })?;
        Ok(ids)
    }

    fn list_persons(&self, query: &PersonListQuery) -> RepoResult<Vec<PersonRecord>> {
        let mut sql = format!("{PERSON_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }

    fn count_persons(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get::<_, i64>(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn insert_on(conn: &Connection, person: &NewPerson) -> RepoResult<PersonId> {
    person.validate()?;

    conn.execute(
        PERSON_INSERT_SQL,
        params![
            person.first_name.as_str(),
            person.last_name.as_str(),
            person.phone.as_str(),
            person.email.as_str(),
            person.age,
            person.national_id.as_str(),
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            RepoError::DuplicateNationalId(person.national_id.clone())
        } else {
            RepoError::from(err)
        }
    })?;

    Ok(conn.last_insert_rowid())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => {
            inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<PersonRecord> {
    Ok(PersonRecord {
        id: row.get("id")?,
        first_name: row.get("firstName")?,
        last_name: row.get("lastName")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        age: row.get("age")?,
        national_id: row.get("nationalId")?,
    })
}
