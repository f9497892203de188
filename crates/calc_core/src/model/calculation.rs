//! Calculation domain model.
//!
//! # Responsibility
//! - Define the record persisted by the history store.
//! - Provide validation shared by write and read paths.
//!
//! # Invariants
//! - `equation` and `result` are never blank for a stored record.
//! - `id` is assigned once at insert time and never reused.
//! - `created_at` is used for ordering only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Store-assigned identifier of a calculation record.
pub type RecordId = Uuid;

/// Validation failure for calculation payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationValidationError {
    EmptyEquation,
    EmptyResult,
}

impl Display for CalculationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEquation => write!(f, "equation must not be empty"),
            Self::EmptyResult => write!(f, "result must not be empty"),
        }
    }
}

impl Error for CalculationValidationError {}

/// An evaluated calculation that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCalculation {
    /// Literal expression as entered, e.g. `12 + 4`.
    pub equation: String,
    /// Rendered result text, e.g. `16`.
    pub result: String,
}

impl NewCalculation {
    pub fn new(equation: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
            result: result.into(),
        }
    }

    /// Checks the non-empty invariant for both fields.
    pub fn validate(&self) -> Result<(), CalculationValidationError> {
        validate_fields(&self.equation, &self.result)
    }
}

/// Persisted calculation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: RecordId,
    pub equation: String,
    pub result: String,
    /// Unix epoch milliseconds at insert time.
    pub created_at: i64,
}

impl CalculationRecord {
    /// Creates a record with a freshly generated id and the current time.
    pub fn from_new(calculation: NewCalculation) -> Self {
        Self::with_id(Uuid::new_v4(), calculation, now_epoch_ms())
    }

    /// Creates a record with caller-provided identity and timestamp.
    ///
    /// Used by read paths and tests that need deterministic ordering.
    pub fn with_id(id: RecordId, calculation: NewCalculation, created_at: i64) -> Self {
        Self {
            id,
            equation: calculation.equation,
            result: calculation.result,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), CalculationValidationError> {
        validate_fields(&self.equation, &self.result)
    }
}

fn validate_fields(equation: &str, result: &str) -> Result<(), CalculationValidationError> {
    if equation.trim().is_empty() {
        return Err(CalculationValidationError::EmptyEquation);
    }
    if result.trim().is_empty() {
        return Err(CalculationValidationError::EmptyResult);
    }
    Ok(())
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` if the system clock reports a time before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{CalculationRecord, CalculationValidationError, NewCalculation};

    #[test]
    fn blank_fields_are_rejected() {
        assert_eq!(
            NewCalculation::new("", "4").validate(),
            Err(CalculationValidationError::EmptyEquation)
        );
        assert_eq!(
            NewCalculation::new("2 + 2", "  ").validate(),
            Err(CalculationValidationError::EmptyResult)
        );
        assert!(NewCalculation::new("2 + 2", "4").validate().is_ok());
    }

    #[test]
    fn from_new_assigns_identity_and_timestamp() {
        let first = CalculationRecord::from_new(NewCalculation::new("1 + 1", "2"));
        let second = CalculationRecord::from_new(NewCalculation::new("1 + 1", "2"));
        assert_ne!(first.id, second.id);
        assert!(first.created_at > 0);
        assert_eq!(first.equation, "1 + 1");
        assert_eq!(first.result, "2");
    }
}
