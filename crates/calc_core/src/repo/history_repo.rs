//! Calculation history repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide append/list/delete APIs over the `calculations` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `CalculationRecord::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing is ordered `created_at DESC, seq DESC`, so ties fall back to
//!   insertion order.

use crate::db::DbError;
use crate::model::calculation::{CalculationRecord, CalculationValidationError, RecordId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CALCULATION_SELECT_SQL: &str = "SELECT
    uuid,
    equation,
    result,
    created_at
FROM calculations";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for calculation persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CalculationValidationError),
    Db(DbError),
    NotFound(RecordId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "calculation not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted calculation data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<CalculationValidationError> for RepoError {
    fn from(value: CalculationValidationError) -> Self {
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

/// Repository interface for the calculation history collection.
pub trait HistoryRepository {
    /// Persists one record. The record id must not exist yet.
    fn insert_calculation(&self, record: &CalculationRecord) -> RepoResult<()>;
    /// Returns at most `limit` records, newest first.
    fn list_recent(&self, limit: u32) -> RepoResult<Vec<CalculationRecord>>;
    /// Removes one record; `NotFound` when no row matched.
    fn delete_calculation(&self, id: RecordId) -> RepoResult<()>;
    /// Removes every record and returns how many rows were deleted.
    fn delete_all(&self) -> RepoResult<usize>;
}

/// SQLite-backed history repository.
pub struct SqliteHistoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHistoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HistoryRepository for SqliteHistoryRepository<'_> {
    fn insert_calculation(&self, record: &CalculationRecord) -> RepoResult<()> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO calculations (uuid, equation, result, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.id.to_string(),
                record.equation.as_str(),
                record.result.as_str(),
                record.created_at,
            ],
        )?;

        Ok(())
    }

    fn list_recent(&self, limit: u32) -> RepoResult<Vec<CalculationRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CALCULATION_SELECT_SQL}
             ORDER BY created_at DESC, seq DESC
             LIMIT ?1;"
        ))?;

        let mut rows = stmt.query(params![i64::from(limit)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_calculation_row(row)?);
        }

        Ok(records)
    }

    fn delete_calculation(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM calculations WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM calculations;", [])?;
        Ok(removed)
    }
}

fn parse_calculation_row(row: &Row<'_>) -> RepoResult<CalculationRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in calculations.uuid"
        ))
    })?;

    let record = CalculationRecord {
        id,
        equation: row.get("equation")?,
        result: row.get("result")?,
        created_at: row.get("created_at")?,
    };
    record.validate()?;
    Ok(record)
}
