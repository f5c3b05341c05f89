//! Application configuration management.
//!
//! Configuration persists as pretty-printed JSON in the platform
//! config directory. Missing or unreadable files fall back to
//! defaults so a broken config never blocks startup; individual
//! missing fields pick up their defaults through serde.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, FileSystemError, Result};
use crate::relocate::RelocateOptions;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Durable directory where kept clips live.
    #[serde(default = "default_library_directory")]
    pub library_directory: PathBuf,

    /// Transient cache root holding the capture staging area.
    #[serde(default = "default_cache_directory")]
    pub cache_directory: PathBuf,

    /// File the playlist snapshot is written to.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: PathBuf,

    /// Relocation tuning.
    #[serde(default)]
    pub relocate: RelocateOptions,

    /// Seed the built-in demo clips into an empty playlist on startup.
    #[serde(default = "default_true")]
    pub seed_demo_clips: bool,
}

fn default_library_directory() -> PathBuf {
    dirs::video_dir()
        .unwrap_or_else(|| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("Clipdeck")
}

fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipdeck")
}

fn default_snapshot_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipdeck")
        .join("playlist.json")
}

const fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_directory: default_library_directory(),
            cache_directory: default_cache_directory(),
            snapshot_file: default_snapshot_file(),
            relocate: RelocateOptions::default(),
            seed_demo_clips: true,
        }
    }
}

impl AppConfig {
    /// Path of the config file in the platform config directory.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clipdeck")
            .join("config.json")
    }

    /// Loads the config from the default location, falling back to
    /// defaults when the file is missing or unreadable.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::config_file_path())
    }

    /// Loads the config from an explicit path.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), "failed to parse config, using defaults: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), "failed to read config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path())
    }

    /// Saves the config to an explicit path, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::FileSystem(FileSystemError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            Error::FileSystem(FileSystemError::WriteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        Ok(())
    }

    /// Checks the configured directories are usable and the relocation
    /// options are valid.
    pub fn validate(&self) -> Result<()> {
        validate_directory(&self.library_directory)?;
        validate_directory(&self.cache_directory)?;
        self.relocate.validate()?;
        Ok(())
    }
}

/// Checks a directory path is absolute and usable, creating it when it
/// does not exist yet. An existing directory must accept writes.
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.is_absolute() {
        return Err(Error::Configuration(format!(
            "directory must be absolute: {}",
            dir.display()
        )));
    }
    if dir.exists() {
        if !dir.is_dir() {
            return Err(Error::Configuration(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        let probe = dir.join(".clipdeck_write_test");
        fs::write(&probe, b"test").map_err(|e| {
            Error::Configuration(format!("directory not writable {}: {e}", dir.display()))
        })?;
        let _ = fs::remove_file(&probe);
    } else {
        fs::create_dir_all(dir).map_err(|e| {
            Error::FileSystem(FileSystemError::CreateDirFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
    }
    Ok(())
}

/// Owns the loaded config and keeps the file on disk in sync with it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: AppConfig,
}

impl ConfigManager {
    /// Manager backed by the default config location.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(AppConfig::config_file_path())
    }

    /// Manager backed by an explicit config file.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        let config = AppConfig::load_from(&path);
        Self { path, config }
    }

    /// The current config.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Applies a mutation and saves the result.
    pub fn update<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        mutate(&mut self.config);
        self.config.save_to(&self.path)
    }

    /// Points the library at a new directory after validating it.
    pub fn set_library_directory(&mut self, dir: PathBuf) -> Result<()> {
        validate_directory(&dir)?;
        self.config.library_directory = dir;
        self.config.save_to(&self.path)
    }

    /// Restores defaults and saves them.
    pub fn reset(&mut self) -> Result<()> {
        self.config = AppConfig::default();
        self.config.save_to(&self.path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
