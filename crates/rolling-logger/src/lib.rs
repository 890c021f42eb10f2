//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to a size-rotated file and
//! keeps the latest lines in memory. Records sent through the `log` facade
//! are bridged into the same file.

mod writer;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

pub use writer::{RollingFile, RollingHandle, SharedRollingFile};

static LOGGER: OnceLock<SharedRollingFile> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Where and how much to log
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub app_name: String,
    /// Rotate once the live file would exceed this size
    pub max_file_bytes: u64,
    /// Rotated files kept next to the live one
    pub max_files: usize,
    /// Lines kept in memory for `recent_lines`
    pub ring_capacity: usize,
    /// `EnvFilter` directive, e.g. `info` or `applicant_board=debug`
    pub level: String,
}

impl LoggerConfig {
    pub fn new(log_dir: impl AsRef<Path>, app_name: &str) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
            app_name: app_name.to_string(),
            max_file_bytes: 5 * 1024 * 1024,
            max_files: 3,
            ring_capacity: 500,
            level: "info".to_string(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.app_name))
    }

    pub fn rotated_path(&self, n: usize) -> PathBuf {
        self.log_dir.join(format!("{}.log.{}", self.app_name, n))
    }
}

/// Local wall-clock timestamps with milliseconds
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize logging into `<log_dir>/<app_name>.log` with default limits
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(LoggerConfig::new(log_dir, app_name))
}

pub fn init_logger_with(config: LoggerConfig) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let filter =
        EnvFilter::try_new(&config.level).map_err(|_| LoggerError::InvalidLevel(config.level.clone()))?;
    let file = SharedRollingFile::open(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file.clone())
        .with_timer(LocalTimer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    LOGGER.set(file).map_err(|_| LoggerError::AlreadyInitialized)
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!(target: "app", "{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!(target: "app", "{}", message);
    Ok(())
}

/// Latest lines written by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER
        .get()
        .map(|file| file.file().recent_lines())
        .unwrap_or_default()
}

pub fn log_file_path() -> Option<PathBuf> {
    LOGGER.get().map(|file| file.file().path())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    LOGGER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}
