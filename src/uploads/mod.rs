//! On-disk storage for uploaded images.
//!
//! Files land in a single flat directory as `<uuid>.<ext>` and are served
//! back under [`PUBLIC_PREFIX`].

use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Per-file size ceiling (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// URL prefix the upload directory is mounted under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    /// Location on disk
    pub path: PathBuf,
    /// URL the file is served from
    pub public_url: String,
}

/// Manages the upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate and write one uploaded image.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<StoredUpload, AppError> {
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(AppError::Validation("Only images allowed!".to_string()));
        }

        if data.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large: {} bytes (max {})",
                data.len(),
                self.max_bytes
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            tracing::error!("Failed to create upload directory {:?}: {}", self.dir, e);
            AppError::Internal(format!("Failed to create upload directory: {}", e))
        })?;

        let file_name = match original_name.and_then(extension_of) {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write upload {:?}: {}", path, e);
            AppError::Internal(format!("Failed to store upload: {}", e))
        })?;

        tracing::debug!(file = %file_name, size = data.len(), "upload stored");

        Ok(StoredUpload {
            path,
            public_url: format!("{}/{}", PUBLIC_PREFIX, file_name),
        })
    }

    /// Best-effort removal of uploaded files.
    pub async fn remove_all<'a>(&self, uploads: impl IntoIterator<Item = &'a StoredUpload>) {
        for upload in uploads {
            match tokio::fs::remove_file(&upload.path).await {
                Ok(()) => tracing::debug!("Removed upload {:?}", upload.path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove upload {:?}: {}", upload.path, e),
            }
        }
    }
}

/// Lower-cased alphanumeric extension of a client-supplied file name.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
