//! Image safety verdicts for uploaded files.

use std::path::Path;

use async_trait::async_trait;

/// Decides whether an uploaded image may be kept.
///
/// Registration awaits one verdict per uploaded file before continuing.
#[async_trait]
pub trait ImageSafetyChecker: Send + Sync {
    /// `true` when the image at `path` is acceptable.
    async fn is_safe(&self, path: &Path) -> bool;
}

/// Approves every image.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveChecker;

#[async_trait]
impl ImageSafetyChecker for PermissiveChecker {
    async fn is_safe(&self, path: &Path) -> bool {
        tracing::trace!("Image safety check skipped for {:?}", path);
        true
    }
}
