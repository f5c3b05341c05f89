//! Snapshot persistence for the playlist.
//!
//! The playlist persists as a single document holding the ordered list
//! of locators and nothing else. Display names are never stored; they
//! are recomputed through the resolver chain on load. Writes replace
//! the whole document, and the JSON store stages to a sibling temp
//! file and renames so a crash mid-write never leaves a torn snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, FileSystemError, Result};
use crate::locator::Locator;

/// Whole-list snapshot storage keyed by nothing: one document, the
/// ordered locator list.
pub trait SnapshotStore {
    /// Loads the persisted locator list; empty if nothing was saved yet.
    fn load(&self) -> Result<Vec<Locator>>;

    /// Replaces the persisted list wholesale.
    fn replace(&self, locators: &[Locator]) -> Result<()>;
}

/// On-disk shape of the snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SavedSnapshot {
    #[serde(default)]
    video_locators: Vec<Locator>,
}

/// Snapshot store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Creates a store writing to `path`. The file and its parent
    /// directories are created on first save.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut raw = self.path.as_os_str().to_os_string();
        raw.push(".tmp");
        PathBuf::from(raw)
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Result<Vec<Locator>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot on disk, starting empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::FileSystem(FileSystemError::ReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        })?;
        let snapshot: SavedSnapshot = serde_json::from_str(&content)?;
        Ok(snapshot.video_locators)
    }

    fn replace(&self, locators: &[Locator]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::FileSystem(FileSystemError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;
        }

        let snapshot = SavedSnapshot {
            video_locators: locators.to_vec(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;

        let staging = self.staging_path();
        fs::write(&staging, content).map_err(|e| {
            Error::FileSystem(FileSystemError::WriteFailed {
                path: staging.clone(),
                reason: e.to_string(),
            })
        })?;
        fs::rename(&staging, &self.path).map_err(|e| {
            Error::FileSystem(FileSystemError::WriteFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        })?;

        debug!(
            path = %self.path.display(),
            count = locators.len(),
            "replaced playlist snapshot"
        );
        Ok(())
    }
}

/// Snapshot store held in memory, for tests and ephemeral embedders.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    locators: Mutex<Vec<Locator>>,
}

impl MemorySnapshotStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Vec<Locator>> {
        let guard = self
            .locators
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn replace(&self, locators: &[Locator]) -> Result<()> {
        let mut guard = self
            .locators
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = locators.to_vec();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_locators() -> Vec<Locator> {
        vec![
            Locator::new("https://example.com/a.mp4"),
            Locator::new("file:///movies/Clipdeck/video_bcd.mp4"),
            Locator::new("https://example.com/c.mp4"),
        ]
    }

    #[test]
    fn load_without_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("playlist.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn replace_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("playlist.json"));

        let locators = sample_locators();
        store.replace(&locators).unwrap();
        assert_eq!(store.load().unwrap(), locators);
    }

    #[test]
    fn replace_overwrites_the_previous_list() {
        let dir = TempDir::new().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("playlist.json"));

        store.replace(&sample_locators()).unwrap();
        let shorter = vec![Locator::new("https://example.com/only.mp4")];
        store.replace(&shorter).unwrap();
        assert_eq!(store.load().unwrap(), shorter);
    }

    #[test]
    fn replace_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("state").join("deep").join("playlist.json");
        let store = JsonSnapshotStore::new(nested.clone());

        store.replace(&sample_locators()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn replace_leaves_no_staging_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        let store = JsonSnapshotStore::new(path.clone());

        store.replace(&sample_locators()).unwrap();
        let mut staging = path.into_os_string();
        staging.push(".tmp");
        assert!(!PathBuf::from(staging).exists());
    }

    #[test]
    fn snapshot_document_holds_only_locators() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        let store = JsonSnapshotStore::new(path.clone());

        store
            .replace(&[Locator::new("https://example.com/a.mp4")])
            .unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value["video_locators"],
            serde_json::json!(["https://example.com/a.mp4"])
        );
        assert!(value.get("names").is_none());
    }

    #[test]
    fn document_missing_the_list_field_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        std::fs::write(&path, "{}").unwrap();

        let store = JsonSnapshotStore::new(path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_document_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonSnapshotStore::new(path);
        assert!(matches!(store.load(), Err(Error::Serialization(_))));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().unwrap().is_empty());

        let locators = sample_locators();
        store.replace(&locators).unwrap();
        assert_eq!(store.load().unwrap(), locators);
    }
}
