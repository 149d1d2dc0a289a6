//! JSON file backed snapshot store.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::SnapshotStore;
use crate::errors::AppError;
use crate::models::Snapshot;

/// Stores the snapshot as a single pretty-printed JSON document.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "database.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Snapshot {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No store file at {:?}, starting empty", self.path);
                return Snapshot::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read store file {:?}: {}", self.path, e);
                return Snapshot::default();
            }
        };

        match Snapshot::from_json_lenient(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Store file {:?} is corrupt, using empty snapshot: {}", self.path, e);
                Snapshot::default()
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Persistence(format!("Failed to create {:?}: {}", parent, e))
                })?;
            }
        }

        let body = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| AppError::Persistence(format!("Failed to encode snapshot: {}", e)))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &body)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to write {:?}: {}", temp, e)))?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            AppError::Persistence(format!("Failed to replace {:?}: {}", self.path, e))
        })?;

        Ok(())
    }
}
