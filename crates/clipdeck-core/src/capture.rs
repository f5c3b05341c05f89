//! Capture staging: the transient file an in-progress recording
//! writes into.
//!
//! Every capture targets the same well-known file under the transient
//! cache, so at most one capture is logically pending at a time. The
//! caller holds the [`PendingCapture`] value for the capture's short
//! life and consumes it by relocating the file to durable storage or
//! by discarding it. A capture left behind by an interrupted session
//! shows up through [`CaptureSession::existing`] on the next start.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, FileSystemError, Result};
use crate::locator::Locator;

/// File name every in-progress capture writes into.
pub const STAGING_FILE_NAME: &str = "new_video.mp4";

/// Subdirectory of the transient cache holding the staging file.
pub const STAGING_SUBDIR: &str = "videos";

/// An in-flight capture, owned by the caller until saved or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCapture {
    path: PathBuf,
}

impl PendingCapture {
    /// Transient path the recording writes into.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the capture, yielding its transient path for
    /// relocation.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Locator for the transient file, for previewing before saving.
    #[must_use]
    pub fn locator(&self) -> Locator {
        Locator::from_path(&self.path)
    }
}

/// Manages the staging area for in-progress captures.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    staging_dir: PathBuf,
}

impl CaptureSession {
    /// Creates a session whose staging area lives in a `videos`
    /// subdirectory of `cache_dir`.
    pub fn new(cache_dir: &Path) -> Result<Self> {
        let staging_dir = cache_dir.join(STAGING_SUBDIR);
        fs::create_dir_all(&staging_dir).map_err(|e| {
            Error::FileSystem(FileSystemError::CreateDirFailed {
                path: staging_dir.clone(),
                reason: e.to_string(),
            })
        })?;
        Ok(Self { staging_dir })
    }

    /// Directory holding the staging file.
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Starts a fresh capture, deleting any stale staging file first.
    pub fn begin(&self) -> Result<PendingCapture> {
        let path = self.staging_path();
        if path.exists() {
            debug!(path = %path.display(), "removing stale capture before starting a new one");
            fs::remove_file(&path).map_err(|e| {
                Error::FileSystem(FileSystemError::DeleteFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            })?;
        }
        Ok(PendingCapture { path })
    }

    /// Capture left behind by an interrupted session, if any.
    #[must_use]
    pub fn existing(&self) -> Option<PendingCapture> {
        let path = self.staging_path();
        path.exists().then(|| PendingCapture { path })
    }

    /// Discards a pending capture, removing its staging file.
    pub fn discard(&self, pending: PendingCapture) -> Result<()> {
        if pending.path.exists() {
            fs::remove_file(&pending.path).map_err(|e| {
                Error::FileSystem(FileSystemError::DeleteFailed {
                    path: pending.path.clone(),
                    reason: e.to_string(),
                })
            })?;
        }
        Ok(())
    }

    /// Discards a leftover capture without first claiming it. Returns
    /// whether a staging file was actually removed.
    pub fn discard_existing(&self) -> Result<bool> {
        match self.existing() {
            Some(pending) => {
                self.discard(pending)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Deletes every file in the staging area, returning how many were
    /// removed. Files that fail to delete are logged and skipped.
    pub fn sweep(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in WalkDir::new(&self.staging_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), "failed to sweep staged file: {e}"),
            }
        }
        debug!(removed, "swept capture staging area");
        Ok(removed)
    }

    fn staging_path(&self) -> PathBuf {
        self.staging_dir.join(STAGING_FILE_NAME)
    }
}
