//! Relocation of captured clips from transient to durable storage.
//!
//! A finished capture sits in the transient staging area until the
//! user keeps it. Keeping means copying the file into the durable
//! library directory under a collision-avoiding generated name,
//! optionally verifying the copy, then deleting the transient source.
//! The operation runs off the caller's thread; completion is reported
//! through a callback so an embedder can refresh its UI.
//!
//! Failures abort the relocation and are logged. There is no retry,
//! no rollback of a partially written destination beyond checksum
//! cleanup, and nothing is fatal to the embedding application.

use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{Error, FileSystemError, RelocateError, Result};
use crate::locator::Locator;

/// Default copy chunk size (64 KB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Smallest accepted chunk size (4 KB).
const MIN_CHUNK_SIZE: usize = 4 * 1024;

/// Largest accepted chunk size (16 MB).
const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Prefix of generated destination names.
const GENERATED_NAME_PREFIX: &str = "video_";

/// Extension of generated destination names.
const GENERATED_NAME_EXT: &str = "mp4";

/// Characters of the random id kept in a generated name.
const GENERATED_ID_LEN: usize = 10;

/// Re-rolls of the random name before falling back to the source name.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Tuning knobs for relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocateOptions {
    /// Copy buffer size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Compare checksums of source and copy before deleting the source.
    #[serde(default)]
    pub verify_checksum: bool,
    /// Carry the source's modification time over to the copy.
    #[serde(default = "default_preserve_timestamps")]
    pub preserve_timestamps: bool,
}

const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

const fn default_preserve_timestamps() -> bool {
    true
}

impl Default for RelocateOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            verify_checksum: false,
            preserve_timestamps: true,
        }
    }
}

impl RelocateOptions {
    /// Options that verify every copy before deleting the source.
    #[must_use]
    pub fn reliable() -> Self {
        Self {
            verify_checksum: true,
            ..Self::default()
        }
    }

    /// Checks the options are usable.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < MIN_CHUNK_SIZE || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::Relocate(RelocateError::InvalidOptions {
                reason: format!(
                    "chunk_size {} outside {MIN_CHUNK_SIZE}..={MAX_CHUNK_SIZE}",
                    self.chunk_size
                ),
            }));
        }
        Ok(())
    }
}

/// Outcome of a successful relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocatedFile {
    /// Transient path the capture was read from. Deleted by the time
    /// this value exists.
    pub source: PathBuf,
    /// Durable path the clip now lives at.
    pub destination: PathBuf,
    /// Bytes written to the destination.
    pub bytes_copied: u64,
}

impl RelocatedFile {
    /// Locator for the clip's new durable location.
    #[must_use]
    pub fn locator(&self) -> Locator {
        Locator::from_path(&self.destination)
    }
}

/// Moves captured clips into the durable library directory.
#[derive(Debug, Clone)]
pub struct Relocator {
    durable_dir: PathBuf,
    options: RelocateOptions,
}

impl Relocator {
    /// Creates a relocator targeting `durable_dir`, creating the
    /// directory if it does not exist yet.
    pub fn new(durable_dir: PathBuf) -> Result<Self> {
        Self::with_options(durable_dir, RelocateOptions::default())
    }

    /// Creates a relocator with explicit options.
    pub fn with_options(durable_dir: PathBuf, options: RelocateOptions) -> Result<Self> {
        options.validate()?;
        fs::create_dir_all(&durable_dir).map_err(|e| {
            Error::FileSystem(FileSystemError::CreateDirFailed {
                path: durable_dir.clone(),
                reason: e.to_string(),
            })
        })?;
        Ok(Self {
            durable_dir,
            options,
        })
    }

    /// Directory relocated clips land in.
    #[must_use]
    pub fn durable_dir(&self) -> &Path {
        &self.durable_dir
    }

    /// Relocates `source` on the calling thread.
    ///
    /// Copies into the durable directory under a fresh name, verifies
    /// the copy when configured to, then deletes the source. On
    /// checksum mismatch the bad copy is removed and the source kept.
    pub fn relocate_blocking(&self, source: &Path) -> Result<RelocatedFile> {
        if !source.is_file() {
            return Err(Error::Relocate(RelocateError::SourceNotFound {
                path: source.to_path_buf(),
            }));
        }
        let source_meta = fs::metadata(source).map_err(|e| {
            Error::FileSystem(FileSystemError::ReadFailed {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        // The directory may have been removed since construction.
        fs::create_dir_all(&self.durable_dir).map_err(|_| {
            Error::Relocate(RelocateError::DestinationNotWritable {
                path: self.durable_dir.clone(),
            })
        })?;

        let destination = pick_destination(&self.durable_dir, source, generated_name)?;
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "relocating capture"
        );

        let bytes_copied = copy_chunked(source, &destination, self.options.chunk_size)?;

        if self.options.verify_checksum {
            let source_sum = file_checksum(source, self.options.chunk_size)?;
            let copy_sum = file_checksum(&destination, self.options.chunk_size)?;
            if source_sum != copy_sum {
                let _ = fs::remove_file(&destination);
                return Err(Error::Relocate(RelocateError::VerificationFailed {
                    source_path: source.to_path_buf(),
                    destination,
                }));
            }
        }

        if self.options.preserve_timestamps {
            preserve_mtime(&source_meta, &destination);
        }

        fs::remove_file(source).map_err(|e| {
            Error::FileSystem(FileSystemError::DeleteFailed {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        info!(
            destination = %destination.display(),
            bytes_copied,
            "relocated capture to durable storage"
        );
        Ok(RelocatedFile {
            source: source.to_path_buf(),
            destination,
            bytes_copied,
        })
    }

    /// Relocates `source` on the blocking thread pool.
    pub async fn relocate(&self, source: PathBuf) -> Result<RelocatedFile> {
        let relocator = self.clone();
        tokio::task::spawn_blocking(move || relocator.relocate_blocking(&source))
            .await
            .map_err(|e| {
                Error::Relocate(RelocateError::Interrupted {
                    reason: e.to_string(),
                })
            })?
    }

    /// Starts a relocation in the background and hands the outcome to
    /// `on_complete` when it finishes. Failures are logged before the
    /// callback runs.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn_relocate<F>(&self, source: PathBuf, on_complete: F) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<RelocatedFile>) + Send + 'static,
    {
        let relocator = self.clone();
        tokio::spawn(async move {
            let outcome = relocator.relocate(source).await;
            if let Err(error) = &outcome {
                error!(%error, "relocation failed");
            }
            on_complete(outcome);
        })
    }

    /// Video files already present in the durable directory, sorted by
    /// path. Creates the directory when it is missing.
    pub fn scan_library(&self) -> Result<Vec<PathBuf>> {
        if !self.durable_dir.exists() {
            fs::create_dir_all(&self.durable_dir).map_err(|e| {
                Error::FileSystem(FileSystemError::CreateDirFailed {
                    path: self.durable_dir.clone(),
                    reason: e.to_string(),
                })
            })?;
            return Ok(Vec::new());
        }

        let mut clips: Vec<PathBuf> = WalkDir::new(&self.durable_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.path().is_file() && is_video_file(entry.path()))
            .map(|entry| entry.path().to_path_buf())
            .collect();
        clips.sort();
        Ok(clips)
    }
}

/// Shortens a string by dropping its middle, keeping both ends.
///
/// Used for generated clip names and for compact display of long
/// names. With `ellipsis` the removed middle is marked with `...`.
#[must_use]
pub fn truncate_middle(text: &str, max_len: usize, ellipsis: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }
    let keep = max_len / 2;
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    if ellipsis {
        format!("{head}...{tail}")
    } else {
        format!("{head}{tail}")
    }
}

/// Whether the path looks like a video file by extension.
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| matches!(ext.as_str(), "mp4" | "m4v" | "mov" | "webm" | "mkv" | "3gp"))
}

/// Fresh `video_<id>.mp4` name with a middle-truncated random id.
fn generated_name() -> String {
    let id = Uuid::new_v4().to_string();
    format!(
        "{GENERATED_NAME_PREFIX}{}.{GENERATED_NAME_EXT}",
        truncate_middle(&id, GENERATED_ID_LEN, false)
    )
}

/// Picks a destination path in `dir` that does not exist yet.
///
/// Generated names are re-rolled on collision; if they keep colliding
/// the source's own file name is tried before giving up.
fn pick_destination<F>(dir: &Path, source: &Path, mut next_name: F) -> Result<PathBuf>
where
    F: FnMut() -> String,
{
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate = dir.join(next_name());
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    let fallback = source.file_name().ok_or_else(|| {
        Error::FileSystem(FileSystemError::InvalidPath {
            path: source.to_path_buf(),
        })
    })?;
    let candidate = dir.join(fallback);
    if candidate.exists() {
        return Err(Error::Relocate(RelocateError::DestinationNotWritable {
            path: dir.to_path_buf(),
        }));
    }
    Ok(candidate)
}

/// Copies `source` to `destination` in `chunk_size` reads.
fn copy_chunked(source: &Path, destination: &Path, chunk_size: usize) -> Result<u64> {
    let input = fs::File::open(source).map_err(|e| {
        Error::FileSystem(FileSystemError::ReadFailed {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })
    })?;
    let output = fs::File::create(destination).map_err(|e| {
        Error::FileSystem(FileSystemError::WriteFailed {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        })
    })?;

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let mut buffer = vec![0u8; chunk_size];
    let mut total: u64 = 0;

    loop {
        let read = reader.read(&mut buffer).map_err(|e| {
            Error::FileSystem(FileSystemError::ReadFailed {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        if read == 0 {
            break;
        }
        writer.write_all(&buffer[..read]).map_err(|e| {
            Error::FileSystem(FileSystemError::CopyFailed {
                source_path: source.to_path_buf(),
                destination: destination.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        total += read as u64;
    }

    writer.flush().map_err(|e| {
        Error::FileSystem(FileSystemError::WriteFailed {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        })
    })?;
    Ok(total)
}

/// SHA-256 of a file, hex encoded.
fn file_checksum(path: &Path, chunk_size: usize) -> Result<String> {
    let file = fs::File::open(path).map_err(|e| {
        Error::FileSystem(FileSystemError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; chunk_size];

    loop {
        let read = reader.read(&mut buffer).map_err(|e| {
            Error::FileSystem(FileSystemError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Best-effort carry-over of the source's modification time.
fn preserve_mtime(source_meta: &fs::Metadata, destination: &Path) {
    let Ok(modified) = source_meta.modified() else {
        return;
    };
    let mtime = FileTime::from_system_time(modified);
    if let Err(e) = filetime::set_file_mtime(destination, mtime) {
        warn!(
            destination = %destination.display(),
            "failed to preserve modification time: {e}"
        );
    }
}
