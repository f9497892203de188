//! Shared request state.
//!
//! # Invariants
//! - Exactly one store connection exists per `AppState` family of clones.
//! - Store work runs on the blocking pool, never on the async executor.

use crate::api::error::ApiError;
use calc_core::{HistoryService, SqliteHistoryRepository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Axum state holding the process-wide history store connection.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Takes ownership of an opened, migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one history use-case against the shared connection.
    ///
    /// # Errors
    /// - Whatever `op` returns.
    /// - `500` when the connection lock is poisoned or the blocking task fails.
    pub async fn with_history<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&HistoryService<SqliteHistoryRepository<'_>>) -> Result<T, ApiError>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| ApiError::internal("history store connection is poisoned"))?;
            let service = HistoryService::new(SqliteHistoryRepository::new(&conn));
            op(&service)
        })
        .await
        .map_err(|err| ApiError::internal(format!("history store task failed: {err}")))?
    }
}
