//! `Clipdeck` Core Library
//!
//! This crate provides the core functionality for the `Clipdeck` application:
//! - Playlist control over an ordered, duplicate-free list of video references
//! - Display-name resolution through an ordered fallback chain
//! - Capture staging for in-progress recordings
//! - Relocation of captured clips from transient to durable storage
//! - Whole-list snapshot persistence of the playlist
//! - Application configuration management
//!
//! The platform media player and the platform content index stay
//! outside the crate; embedders wire them in through the
//! [`player::PlayerPort`] and [`metadata::ContentIndex`] traits.
//!
//! # Error Handling
//!
//! Errors are typed per domain and nothing is fatal to the embedding
//! application. See the [`error`] module for details.
//!
//! ```rust,ignore
//! use clipdeck_core::{NullPlayer, PlaylistController, MemorySnapshotStore, Result};
//!
//! fn build() -> Result<()> {
//!     let mut playlist = PlaylistController::new(NullPlayer, MemorySnapshotStore::new());
//!     playlist.add_locator("https://example.com/clip.mp4")?;
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod locator;
pub mod logging;
pub mod metadata;
pub mod player;
pub mod playlist;
pub mod relocate;
pub mod store;

pub use capture::{CaptureSession, PendingCapture, STAGING_FILE_NAME, STAGING_SUBDIR};
pub use config::{AppConfig, ConfigManager, validate_directory};
pub use error::{Error, FileSystemError, PlaylistError, RelocateError, Result};
pub use locator::{Locator, Playable, Scheme, VideoReference};
pub use logging::{LogRotation, LoggingConfig, LoggingError, LoggingGuard, default_log_directory};
pub use metadata::{
    ContentIndex, ContentIndexResolver, DisplayNameResolver, NameResolver, NoContentIndex,
    PathSegmentResolver, SuppliedTitleResolver, UNKNOWN_NAME,
};
pub use player::{NullPlayer, PlayerPort};
pub use playlist::{PlaylistController, SAMPLE_CLIPS};
pub use relocate::{
    DEFAULT_CHUNK_SIZE, RelocateOptions, RelocatedFile, Relocator, is_video_file, truncate_middle,
};
pub use store::{JsonSnapshotStore, MemorySnapshotStore, SnapshotStore};
