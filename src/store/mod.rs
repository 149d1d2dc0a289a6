//! Snapshot persistence.
//!
//! The whole store is the unit of persistence: every operation loads the full
//! snapshot and mutations write it back in full.

mod json_file;
mod memory;
mod repository;

pub use json_file::*;
pub use memory::*;
pub use repository::*;

use std::str::FromStr;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::Snapshot;

/// Backing medium for the snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the current snapshot. Missing or unreadable data yields an empty snapshot.
    async fn load(&self) -> Snapshot;

    /// Persist the full snapshot, replacing any prior content.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError>;
}

/// What to do when a save fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistencePolicy {
    /// Log the failure and let the request succeed with its in-memory result.
    #[default]
    FailOpen,
    /// Surface the failure to the caller.
    FailClosed,
}

impl FromStr for PersistencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-open" | "open" => Ok(PersistencePolicy::FailOpen),
            "fail-closed" | "closed" => Ok(PersistencePolicy::FailClosed),
            other => Err(format!("unknown persistence policy {:?}", other)),
        }
    }
}

impl PersistencePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistencePolicy::FailOpen => "fail-open",
            PersistencePolicy::FailClosed => "fail-closed",
        }
    }
}
