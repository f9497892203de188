//! History view synchronization.
//!
//! # Responsibility
//! - Keep the client's history list in step with the remote store.
//! - Degrade to a session-local fallback list when the store is unreachable.
//!
//! # Invariants
//! - `remote` mirrors the last successful fetch; it is only replaced, never edited
//!   except to drop an entry the store confirmed deleted.
//! - `fallback` holds entries the store never accepted, newest first. It is
//!   discarded on the next successful fetch and never pushed to the store.
//! - The visible list is `fallback ++ remote`, capped at `HISTORY_VIEW_LIMIT`.
//! - Mutating calls take `&mut self`, so two store calls never overlap.

use crate::calculator::input::InputState;
use crate::model::calculation::NewCalculation;
use crate::sync::remote::{HistoryRemote, RemoteCalculation, RemoteError};
use log::{error, info, warn};
use std::fmt::{Display, Formatter};

/// Maximum number of entries in the visible history list.
pub const HISTORY_VIEW_LIMIT: usize = 10;

/// Identifier of a visible history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryId {
    /// Identifier assigned by the remote store.
    Remote(String),
    /// Session-unique identifier of a fallback entry.
    Local(u64),
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(id) => write!(f, "{id}"),
            Self::Local(seq) => write!(f, "local-{seq}"),
        }
    }
}

/// Client view of one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub eq: String,
    pub res: String,
}

impl HistoryEntry {
    /// Whether this entry exists only in the current session.
    pub fn is_local(&self) -> bool {
        matches!(self.id, EntryId::Local(_))
    }
}

impl From<RemoteCalculation> for HistoryEntry {
    fn from(value: RemoteCalculation) -> Self {
        Self {
            id: EntryId::Remote(value.id),
            eq: value.equation,
            res: value.result,
        }
    }
}

/// Where a saved calculation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Store accepted the calculation.
    Stored,
    /// Store was unavailable; a fallback entry with this id was added.
    LocalFallback(EntryId),
}

/// Synchronizes the visible history list with a `HistoryRemote`.
pub struct HistorySynchronizer<R: HistoryRemote> {
    remote_store: R,
    remote: Vec<HistoryEntry>,
    fallback: Vec<HistoryEntry>,
    next_local_id: u64,
}

impl<R: HistoryRemote> HistorySynchronizer<R> {
    pub fn new(remote_store: R) -> Self {
        Self {
            remote_store,
            remote: Vec::new(),
            fallback: Vec::new(),
            next_local_id: 1,
        }
    }

    /// Visible entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.fallback
            .iter()
            .chain(self.remote.iter())
            .take(HISTORY_VIEW_LIMIT)
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Result text of a visible entry.
    pub fn result_of(&self, id: &EntryId) -> Option<&str> {
        self.entries()
            .find(|entry| &entry.id == id)
            .map(|entry| entry.res.as_str())
    }

    /// Feeds a visible entry's result into the calculator buffer.
    ///
    /// Returns `false` when no visible entry has this id.
    pub fn recall_into(&self, id: &EntryId, state: &mut InputState) -> bool {
        match self.result_of(id) {
            Some(value) => {
                state.recall(value);
                true
            }
            None => false,
        }
    }

    /// Replaces the remote view with the store's most recent records.
    ///
    /// # Contract
    /// - Success discards every fallback entry.
    /// - Failure is logged and leaves both views unchanged.
    pub async fn refresh(&mut self) -> Result<(), RemoteError> {
        match self.remote_store.fetch_recent().await {
            Ok(records) => {
                self.remote = records
                    .into_iter()
                    .take(HISTORY_VIEW_LIMIT)
                    .map(HistoryEntry::from)
                    .collect();
                let discarded = std::mem::take(&mut self.fallback).len();
                info!(
                    "event=history_refresh module=sync status=ok entries={} discarded_local={discarded}",
                    self.remote.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=history_refresh module=sync status=error error={err}");
                Err(err)
            }
        }
    }

    /// Persists an evaluated calculation, falling back to a local entry.
    ///
    /// # Contract
    /// - Store success triggers a refresh so order and limit stay authoritative.
    /// - An unreadable success body still means the store accepted the record,
    ///   so it is treated like success and no fallback entry is made.
    /// - Any other store failure prepends a fallback entry with a fresh local id.
    pub async fn save(&mut self, calculation: NewCalculation) -> SaveOutcome {
        match self.remote_store.create(&calculation).await {
            Ok(stored) => {
                info!(
                    "event=history_save module=sync status=ok id={}",
                    stored.id
                );
                // A failed refresh is already logged; the saved record shows up
                // on the next successful one.
                let _ = self.refresh().await;
                SaveOutcome::Stored
            }
            Err(RemoteError::Decode(reason)) => {
                warn!("event=history_save module=sync status=unreadable_reply error={reason}");
                let _ = self.refresh().await;
                SaveOutcome::Stored
            }
            Err(err) => {
                warn!("event=history_save module=sync status=fallback error={err}");
                let id = EntryId::Local(self.next_local_id);
                self.next_local_id += 1;
                self.fallback.insert(
                    0,
                    HistoryEntry {
                        id: id.clone(),
                        eq: calculation.equation,
                        res: calculation.result,
                    },
                );
                self.fallback.truncate(HISTORY_VIEW_LIMIT);
                SaveOutcome::LocalFallback(id)
            }
        }
    }

    /// Deletes one visible entry.
    ///
    /// # Contract
    /// - Remote entries are removed only after the store confirms deletion.
    /// - Fallback entries are removed without contacting the store.
    pub async fn delete(&mut self, id: &EntryId) -> Result<(), RemoteError> {
        match id {
            EntryId::Local(_) => {
                self.fallback.retain(|entry| &entry.id != id);
                Ok(())
            }
            EntryId::Remote(remote_id) => match self.remote_store.delete(remote_id).await {
                Ok(()) => {
                    self.remote.retain(|entry| &entry.id != id);
                    info!("event=history_delete module=sync status=ok id={remote_id}");
                    Ok(())
                }
                Err(err) => {
                    error!(
                        "event=history_delete module=sync status=error id={remote_id} error={err}"
                    );
                    Err(err)
                }
            },
        }
    }

    /// Clears the store and, on success, both local views.
    pub async fn clear(&mut self) -> Result<(), RemoteError> {
        match self.remote_store.clear().await {
            Ok(()) => {
                self.remote.clear();
                self.fallback.clear();
                info!("event=history_clear module=sync status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=history_clear module=sync status=error error={err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryId, HistoryEntry, HistorySynchronizer, SaveOutcome, HISTORY_VIEW_LIMIT};
    use crate::calculator::input::InputState;
    use crate::model::calculation::NewCalculation;
    use crate::sync::remote::{HistoryRemote, RemoteCalculation, RemoteError};
    use async_trait::async_trait;

    struct OfflineRemote;

    #[async_trait]
    impl HistoryRemote for OfflineRemote {
        async fn fetch_recent(&self) -> Result<Vec<RemoteCalculation>, RemoteError> {
            Err(RemoteError::Transport("connection refused".to_string()))
        }

        async fn create(&self, _: &NewCalculation) -> Result<RemoteCalculation, RemoteError> {
            Err(RemoteError::Transport("connection refused".to_string()))
        }

        async fn delete(&self, _: &str) -> Result<(), RemoteError> {
            Err(RemoteError::Transport("connection refused".to_string()))
        }

        async fn clear(&self) -> Result<(), RemoteError> {
            Err(RemoteError::Transport("connection refused".to_string()))
        }
    }

    /// Accepts every create but answers with a body the client cannot read.
    struct GarbledReplyRemote;

    #[async_trait]
    impl HistoryRemote for GarbledReplyRemote {
        async fn fetch_recent(&self) -> Result<Vec<RemoteCalculation>, RemoteError> {
            Ok(vec![RemoteCalculation {
                id: "stored-1".to_string(),
                equation: "6 * 7".to_string(),
                result: "42".to_string(),
            }])
        }

        async fn create(&self, _: &NewCalculation) -> Result<RemoteCalculation, RemoteError> {
            Err(RemoteError::Decode("expected value at line 1".to_string()))
        }

        async fn delete(&self, _: &str) -> Result<(), RemoteError> {
            Ok(())
        }

        async fn clear(&self) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unreadable_create_reply_refreshes_instead_of_falling_back() {
        let mut sync = HistorySynchronizer::new(GarbledReplyRemote);

        let outcome = sync.save(NewCalculation::new("6 * 7", "42")).await;

        assert_eq!(outcome, SaveOutcome::Stored);
        let entries: Vec<&HistoryEntry> = sync.entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, EntryId::Remote("stored-1".to_string()));
        assert!(!entries[0].is_local());
    }

    #[tokio::test]
    async fn offline_save_creates_local_entries_capped_at_limit() {
        let mut sync = HistorySynchronizer::new(OfflineRemote);

        for n in 0..12 {
            let outcome = sync
                .save(NewCalculation::new(format!("{n} + 1"), (n + 1).to_string()))
                .await;
            assert!(matches!(outcome, SaveOutcome::LocalFallback(_)));
        }

        let entries: Vec<&HistoryEntry> = sync.entries().collect();
        assert_eq!(entries.len(), HISTORY_VIEW_LIMIT);
        assert_eq!(entries[0].eq, "11 + 1");
        assert_eq!(entries[0].id, EntryId::Local(12));
        assert!(entries.iter().all(|entry| entry.is_local()));
    }

    #[tokio::test]
    async fn local_entries_delete_and_recall_without_store() {
        let mut sync = HistorySynchronizer::new(OfflineRemote);
        let SaveOutcome::LocalFallback(id) = sync.save(NewCalculation::new("6 * 7", "42")).await
        else {
            panic!("offline save must fall back");
        };

        let mut state = InputState::new();
        assert!(sync.recall_into(&id, &mut state));
        assert_eq!(state.buffer(), "42");

        sync.delete(&id).await.unwrap();
        assert!(sync.is_empty());
        assert!(!sync.recall_into(&id, &mut state));
    }

    #[tokio::test]
    async fn failed_refresh_and_clear_leave_view_unchanged() {
        let mut sync = HistorySynchronizer::new(OfflineRemote);
        sync.save(NewCalculation::new("1 + 1", "2")).await;

        assert!(sync.refresh().await.is_err());
        assert!(sync.clear().await.is_err());
        assert_eq!(sync.len(), 1);
    }
}
