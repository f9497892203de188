//! Core domain logic for the calculator and its persisted history.
//! This crate is the single source of truth for business invariants.

pub mod calculator;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use calculator::eval::{evaluate, format_result, sanitize, EvalError, MAX_NESTING_DEPTH};
pub use calculator::input::{InputState, Key, Operator, UnknownKey, DEFAULT_BUFFER, ERROR_MARKER};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::calculation::{
    CalculationRecord, CalculationValidationError, NewCalculation, RecordId,
};
pub use repo::history_repo::{HistoryRepository, RepoError, RepoResult, SqliteHistoryRepository};
pub use service::history_service::{HistoryService, HistoryServiceError, HISTORY_LIST_LIMIT};
pub use sync::remote::{HistoryRemote, RemoteCalculation, RemoteError};
pub use sync::synchronizer::{
    EntryId, HistoryEntry, HistorySynchronizer, SaveOutcome, HISTORY_VIEW_LIMIT,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
