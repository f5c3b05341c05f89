//! Structured logging setup built on tracing.
//!
//! Console output is human readable and filtered for interactive use;
//! file output is JSON, rotated, and more verbose so problems in the
//! field can be reconstructed. Embedders call [`init`] once at startup
//! and hold the returned guard for the life of the process.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory log files are written to.
    pub directory: PathBuf,
    /// Log file name prefix ("clipdeck" -> "clipdeck.2024-01-15.log").
    pub file_prefix: String,
    /// Maximum level printed to the console.
    pub console_level: Level,
    /// Maximum level written to the file.
    pub file_level: Level,
    /// How often a new log file is started.
    pub rotation: LogRotation,
    /// Rotated files kept on disk (0 keeps everything).
    pub max_log_files: usize,
    /// ANSI colors on the console.
    pub ansi: bool,
    /// Include target module and file/line in console output.
    pub verbose_locations: bool,
}

/// Log rotation frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    /// New file every hour.
    Hourly,
    /// New file every day.
    Daily,
    /// Single file, never rotated.
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggingConfig {
    /// Verbose configuration for local development.
    #[must_use]
    pub fn development() -> Self {
        Self {
            directory: default_log_directory(),
            file_prefix: "clipdeck".to_string(),
            console_level: Level::DEBUG,
            file_level: Level::TRACE,
            rotation: LogRotation::Hourly,
            max_log_files: 24,
            ansi: true,
            verbose_locations: true,
        }
    }

    /// Quiet console, detailed file, for shipped builds.
    #[must_use]
    pub fn production() -> Self {
        Self {
            directory: default_log_directory(),
            file_prefix: "clipdeck".to_string(),
            console_level: Level::INFO,
            file_level: Level::DEBUG,
            rotation: LogRotation::Daily,
            max_log_files: 7,
            ansi: true,
            verbose_locations: false,
        }
    }

    /// Development config in debug builds, production otherwise.
    #[must_use]
    pub fn auto() -> Self {
        if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::production()
        }
    }

    /// Sets the log directory.
    #[must_use]
    pub fn with_directory(mut self, path: PathBuf) -> Self {
        self.directory = path;
        self
    }

    /// Sets the log file prefix.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Sets the console level.
    #[must_use]
    pub const fn with_console_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self
    }

    /// Sets the file level.
    #[must_use]
    pub const fn with_file_level(mut self, level: Level) -> Self {
        self.file_level = level;
        self
    }

    /// Sets the rotation frequency.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Keeps file logging alive; dropping it flushes pending entries.
pub struct LoggingGuard {
    _file_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initializes the global subscriber with console and file layers.
///
/// The returned guard must live as long as the application so buffered
/// file output reaches disk.
///
/// # Errors
///
/// Returns an error if the log directory or the file appender cannot
/// be set up.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    if !config.directory.exists() {
        std::fs::create_dir_all(&config.directory).map_err(|e| {
            LoggingError::DirectoryCreationFailed {
                path: config.directory.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    let mut appender_builder = RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log");
    if config.max_log_files > 0 {
        appender_builder = appender_builder.max_log_files(config.max_log_files);
    }
    let file_appender = appender_builder
        .build(&config.directory)
        .map_err(|e| LoggingError::AppenderFailed {
            reason: e.to_string(),
        })?;
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG overrides the console filter when set.
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(level_to_directive(config.console_level))
            .add_directive("clipdeck=info".parse().expect("valid directive"))
            .add_directive("clipdeck_core=info".parse().expect("valid directive"))
    });
    let file_filter = EnvFilter::new(level_to_directive(config.file_level))
        .add_directive("clipdeck=trace".parse().expect("valid directive"))
        .add_directive("clipdeck_core=trace".parse().expect("valid directive"));

    let console_layer = fmt::layer()
        .with_ansi(config.ansi)
        .with_target(config.verbose_locations)
        .with_file(config.verbose_locations)
        .with_line_number(config.verbose_locations)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Initializes logging with [`LoggingConfig::auto`].
///
/// # Errors
///
/// Returns an error if initialization fails.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_auto() -> Result<LoggingGuard, LoggingError> {
    init(&LoggingConfig::auto())
}

/// Default log directory under the platform data directory.
#[must_use]
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipdeck")
        .join("logs")
}

const fn level_to_directive(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Errors raised while setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("Failed to create log directory {path}: {reason}")]
    DirectoryCreationFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// The rolling file appender could not be built.
    #[error("Failed to build log file appender: {reason}")]
    AppenderFailed {
        /// Underlying cause.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_production() {
        let config = LoggingConfig::default();
        assert_eq!(config.console_level, Level::INFO);
        assert_eq!(config.file_level, Level::DEBUG);
        assert_eq!(config.rotation, LogRotation::Daily);
        assert!(!config.verbose_locations);
    }

    #[test]
    fn development_config_is_verbose() {
        let config = LoggingConfig::development();
        assert_eq!(config.console_level, Level::DEBUG);
        assert_eq!(config.file_level, Level::TRACE);
        assert_eq!(config.rotation, LogRotation::Hourly);
        assert!(config.verbose_locations);
    }

    #[test]
    fn builder_overrides_preset_values() {
        let config = LoggingConfig::production()
            .with_console_level(Level::WARN)
            .with_file_level(Level::INFO)
            .with_rotation(LogRotation::Never)
            .with_file_prefix("clipdeck-test");

        assert_eq!(config.console_level, Level::WARN);
        assert_eq!(config.file_level, Level::INFO);
        assert_eq!(config.rotation, LogRotation::Never);
        assert_eq!(config.file_prefix, "clipdeck-test");
    }

    #[test]
    fn rotation_converts_to_appender_rotation() {
        assert!(matches!(
            Rotation::from(LogRotation::Hourly),
            Rotation::HOURLY
        ));
        assert!(matches!(Rotation::from(LogRotation::Daily), Rotation::DAILY));
        assert!(matches!(Rotation::from(LogRotation::Never), Rotation::NEVER));
    }

    #[test]
    fn default_log_directory_is_app_scoped() {
        let dir = default_log_directory();
        assert!(dir.to_string_lossy().contains("clipdeck"));
        assert!(dir.to_string_lossy().contains("logs"));
    }
}
