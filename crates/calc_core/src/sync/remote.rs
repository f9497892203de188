//! Remote history store contract used by the synchronizer.
//!
//! # Responsibility
//! - Describe the four history store calls independent of transport.
//!
//! # Invariants
//! - `fetch_recent` returns records newest first.
//! - Any non-success response is surfaced as `RemoteError`, never as data.

use crate::model::calculation::NewCalculation;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record shape returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCalculation {
    /// Opaque store identifier.
    pub id: String,
    pub equation: String,
    pub result: String,
}

/// Failure talking to the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Store could not be reached or the exchange broke off.
    Transport(String),
    /// Store answered with a non-success status.
    Status { code: u16, message: String },
    /// Store answered with a body that could not be read.
    Decode(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "history store unreachable: {message}"),
            Self::Status { code, message } => {
                write!(f, "history store returned status {code}: {message}")
            }
            Self::Decode(message) => write!(f, "invalid history store response: {message}"),
        }
    }
}

impl Error for RemoteError {}

/// Transport-agnostic history store client.
#[async_trait]
pub trait HistoryRemote: Send + Sync {
    /// Lists the most recent records, newest first.
    async fn fetch_recent(&self) -> Result<Vec<RemoteCalculation>, RemoteError>;
    /// Appends one calculation and returns the stored record.
    async fn create(&self, calculation: &NewCalculation) -> Result<RemoteCalculation, RemoteError>;
    /// Deletes one record by store identifier.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
    /// Deletes every record.
    async fn clear(&self) -> Result<(), RemoteError>;
}
