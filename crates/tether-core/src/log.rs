//! Logging setup: `tracing` with an optional size-rotated log file.
//!
//! With file logging enabled, logs are written to
//! `~/.config/tether/logs/tether.log`. When the file exceeds the configured
//! max size, it is rotated to `tether.log.1` (one backup kept). Otherwise
//! logs go to stderr, filtered by `RUST_LOG` when set.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "tether.log";
const BACKUP_EXTENSION: &str = "log.1";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "trace", "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// Falls back to stderr if the log file cannot be opened.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.enabled {
        let file = crate::config::config_dir()
            .map(|dir| dir.join("logs"))
            .and_then(|dir| RotatingFile::open(&dir, config.max_file_mb * 1024 * 1024).ok());
        if let Some(file) = file {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            return;
        }
        eprintln!("Warning: could not open log file, logging to stderr");
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or(filter);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// An append-only log file that rotates itself past a size limit.
pub struct RotatingFile {
    file: Option<File>,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

impl RotatingFile {
    /// Opens (or creates) `tether.log` inside `dir`.
    ///
    /// A `max_bytes` of zero disables rotation.
    pub fn open(dir: &Path, max_bytes: u64) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            file: Some(file),
            path,
            max_bytes,
            written,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        let backup = self.path.with_extension(BACKUP_EXTENSION);
        // The handle must be closed before the rename on Windows.
        self.file = None;
        let renamed = fs::rename(&self.path, &backup);
        self.file = Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?,
        );
        renamed?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is closed"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        if self.max_bytes > 0
            && self.written >= self.max_bytes
            && let Err(e) = self.rotate()
        {
            eprintln!("Warning: log rotation failed: {e}");
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}
