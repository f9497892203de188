//! History store use-case service.
//!
//! # Responsibility
//! - Provide list/create/delete/clear entry points for the history store.
//! - Assign identity and creation time to new calculations.
//!
//! # Invariants
//! - `list_recent` never returns more than `HISTORY_LIST_LIMIT` records.
//! - Records are never edited; there is no update use-case.

use crate::model::calculation::{
    CalculationRecord, CalculationValidationError, NewCalculation, RecordId,
};
use crate::repo::history_repo::{HistoryRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of records returned by the list use-case.
pub const HISTORY_LIST_LIMIT: u32 = 10;

/// Service error for history use-cases.
#[derive(Debug)]
pub enum HistoryServiceError {
    /// Submitted calculation is missing the equation or the result.
    InvalidCalculation(CalculationValidationError),
    /// No record exists for the given id.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for HistoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCalculation(err) => write!(f, "invalid calculation: {err}"),
            Self::NotFound(id) => write!(f, "calculation not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HistoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCalculation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for HistoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id.to_string()),
            RepoError::Validation(err) => Self::InvalidCalculation(err),
            other => Self::Repo(other),
        }
    }
}

pub type HistoryServiceResult<T> = Result<T, HistoryServiceError>;

/// Use-case service over a history repository.
pub struct HistoryService<R: HistoryRepository> {
    repo: R,
}

impl<R: HistoryRepository> HistoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the most recent calculations, newest first.
    pub fn list_recent(&self) -> HistoryServiceResult<Vec<CalculationRecord>> {
        Ok(self.repo.list_recent(HISTORY_LIST_LIMIT)?)
    }

    /// Validates and stores a calculation.
    ///
    /// # Contract
    /// - Rejects blank `equation`/`result` before touching storage.
    /// - Returns the stored record including assigned id and timestamp.
    pub fn create(&self, calculation: NewCalculation) -> HistoryServiceResult<CalculationRecord> {
        calculation
            .validate()
            .map_err(HistoryServiceError::InvalidCalculation)?;

        let record = CalculationRecord::from_new(calculation);
        self.repo.insert_calculation(&record)?;
        info!(
            "event=history_create module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Deletes one calculation by its textual id.
    ///
    /// Ids that are not valid record identifiers cannot match any stored
    /// record and are reported as not found.
    pub fn delete(&self, raw_id: &str) -> HistoryServiceResult<()> {
        let id: RecordId = raw_id
            .trim()
            .parse()
            .map_err(|_| HistoryServiceError::NotFound(raw_id.to_string()))?;
        self.repo.delete_calculation(id)?;
        info!("event=history_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Removes every stored calculation and returns the number removed.
    pub fn clear(&self) -> HistoryServiceResult<usize> {
        let removed = self.repo.delete_all()?;
        info!("event=history_clear module=service status=ok removed={removed}");
        Ok(removed)
    }
}
