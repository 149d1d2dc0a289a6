//! In-memory snapshot store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SnapshotStore;
use crate::errors::AppError;
use crate::models::Snapshot;

/// Keeps the snapshot in process memory. Used by tests and embedders.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Snapshot>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }
}
