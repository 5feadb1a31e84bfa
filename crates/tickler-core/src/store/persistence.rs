//! Snapshot persistence over a `LocalStorage`.

use std::sync::Arc;

use crate::domain::{Snapshot, TicklerError};
use crate::ports::LocalStorage;

use super::TaskStore;

/// Reads and writes the whole task list under one fixed key.
///
/// Always a whole-state overwrite: no incremental updates, last writer wins.
#[derive(Clone)]
pub struct SnapshotRepository {
    storage: Arc<dyn LocalStorage>,
    key: String,
}

impl SnapshotRepository {
    pub fn new(storage: Arc<dyn LocalStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored task list.
    ///
    /// First run, unreadable storage, and malformed data all yield an empty
    /// store; none of them is surfaced to the user.
    pub fn load(&self) -> TaskStore {
        let blob = match self.storage.get_item(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no snapshot stored yet");
                return TaskStore::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "snapshot unreadable, starting empty");
                return TaskStore::new();
            }
        };
        TaskStore::from_snapshot(Snapshot::decode(&blob))
    }

    pub fn save(&self, store: &TaskStore) -> Result<(), TicklerError> {
        let blob = store.to_snapshot().encode()?;
        self.storage.set_item(&self.key, &blob)?;
        tracing::trace!(key = %self.key, tasks = store.len(), "snapshot saved");
        Ok(())
    }
}
