//! Error types for clipdeck-core operations.
//!
//! Errors are grouped per concern so callers can match on the failure
//! domain without string inspection. Nothing here is fatal to the
//! embedding application: playlist misses degrade to no-ops, file
//! system failures abort the single operation that hit them.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout clipdeck-core.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for all clipdeck-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Playlist operation failed.
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    /// File system operation failed.
    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),

    /// Relocation of a captured clip failed.
    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Underlying I/O error without a more specific classification.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by playlist operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// No entry with the given locator exists in the playlist.
    #[error("No playlist entry for locator: {locator}")]
    NotFound {
        /// Locator that was looked up.
        locator: String,
    },

    /// An entry with the given locator is already present.
    #[error("Locator already in playlist: {locator}")]
    Duplicate {
        /// Locator that was offered twice.
        locator: String,
    },

    /// Deletion was requested for a clip that is not a local file.
    #[error("Can't delete a {scheme} sourced video")]
    NotDeletable {
        /// Locator of the clip.
        locator: String,
        /// Scheme that made the clip non-deletable.
        scheme: String,
    },
}

/// Errors raised by file system access.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// Reading a file failed.
    #[error("Failed to read {path}: {reason}")]
    ReadFailed {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Writing a file failed.
    #[error("Failed to write {path}: {reason}")]
    WriteFailed {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Creating a directory failed.
    #[error("Failed to create directory {path}: {reason}")]
    CreateDirFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Deleting a file failed.
    #[error("Failed to delete {path}: {reason}")]
    DeleteFailed {
        /// File that could not be deleted.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Copying a file failed.
    #[error("Failed to copy {source_path} to {destination}: {reason}")]
    CopyFailed {
        /// File being copied.
        source_path: PathBuf,
        /// Where the copy was headed.
        destination: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// A path that was expected to exist does not.
    #[error("Not found: {path}")]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// A path could not be interpreted for the requested operation.
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// Offending path.
        path: PathBuf,
    },
}

/// Errors raised while relocating a captured clip to durable storage.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The transient source file is gone.
    #[error("Source file not found: {path}")]
    SourceNotFound {
        /// Path that was expected to hold the capture.
        path: PathBuf,
    },

    /// The durable directory cannot accept the clip.
    #[error("Destination is not writable: {path}")]
    DestinationNotWritable {
        /// Directory that rejected the write.
        path: PathBuf,
    },

    /// Destination bytes did not match the source after copying.
    #[error("Checksum mismatch after copying {source_path} to {destination}")]
    VerificationFailed {
        /// File that was copied.
        source_path: PathBuf,
        /// Copy that failed verification.
        destination: PathBuf,
    },

    /// Relocation options fail validation.
    #[error("Invalid relocation options: {reason}")]
    InvalidOptions {
        /// What was wrong with the options.
        reason: String,
    },

    /// The background relocation task ended before completing.
    #[error("Relocation interrupted: {reason}")]
    Interrupted {
        /// Why the task ended early.
        reason: String,
    },
}
