//! Best-effort JSON persistence for the similarity stores.
//!
//! Snapshots are an explicit load/flush lifecycle owned by the caller (the
//! CLI wires them around a session); nothing here writes in the background,
//! and no durability guarantee is made beyond a successful `flush`.

use errors::MemoryError;
use serde::{Deserialize, Serialize};
use sg_core::VectorEntry;
use std::path::{Path, PathBuf};
use tracing::info;

/// Serialized contents of both stores. Round-trips exactly: text, vector,
/// metadata, and timestamps are preserved bit-for-bit through serde_json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub cache: Vec<VectorEntry>,
    pub defense: Vec<VectorEntry>,
}

impl MemorySnapshot {
    pub fn entry_count(&self) -> usize {
        self.cache.len() + self.defense.len()
    }
}

/// Handle to a snapshot file on disk.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a snapshot from disk. A missing file is not an error: it is
    /// the empty initial state.
    pub fn load(&self) -> Result<Option<MemorySnapshot>, MemoryError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(MemoryError::SnapshotIo {
                    path: self.path.display().to_string(),
                    reason: err.to_string(),
                });
            }
        };

        let snapshot: MemorySnapshot =
            serde_json::from_str(&raw).map_err(|err| MemoryError::SnapshotCorrupted {
                path: self.path.display().to_string(),
                reason: err.to_string(),
            })?;

        info!(path = %self.path.display(), entries = snapshot.entry_count(), "snapshot loaded");
        Ok(Some(snapshot))
    }

    /// Writes a snapshot to disk, creating parent directories as needed.
    pub fn flush(&self, snapshot: &MemorySnapshot) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| MemoryError::SnapshotIo {
                    path: self.path.display().to_string(),
                    reason: err.to_string(),
                })?;
            }
        }

        let raw = serde_json::to_string_pretty(snapshot).map_err(|err| {
            MemoryError::SnapshotCorrupted {
                path: self.path.display().to_string(),
                reason: err.to_string(),
            }
        })?;

        std::fs::write(&self.path, raw).map_err(|err| MemoryError::SnapshotIo {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        })?;

        info!(path = %self.path.display(), entries = snapshot.entry_count(), "snapshot flushed");
        Ok(())
    }
}
