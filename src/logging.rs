//! Structured logging setup.
//!
//! The crate itself only emits `tracing` events; applications install a
//! subscriber once at startup with [`init_logging`]. A full-screen UI owns
//! stdout, so logs go to stderr or, preferably, to a file.
//!
//! Field names used across the crate:
//! - `atom`: atom name
//! - `source`, `kind`: event origin and kind
//! - `lines`: batch size of a bulk insert
//! - `percentage`: requested scroll position

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as layer_fmt, EnvFilter};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// JSON lines.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Compact => f.write_str("compact"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (`info`, `atoms=trace`, ...). `RUST_LOG` wins if set.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file: None,
        }
    }
}

/// Errors from [`init_logging`].
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A global subscriber is already installed.
    #[error("logging already initialized")]
    AlreadyInitialized,

    /// The level is not a valid filter directive.
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// The log file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    FileOpen {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

fn open_log_file(path: &Path) -> Result<BoxMakeWriter, LogError> {
    let open = || -> io::Result<std::fs::File> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };
    let file = open().map_err(|source| LogError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

/// Install the global subscriber.
///
/// Call once at startup. Later calls fail with
/// [`LogError::AlreadyInitialized`].
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|_| LogError::InvalidLevel(config.level.clone()))?;

    let writer = match &config.file {
        Some(path) => open_log_file(path)?,
        None => BoxMakeWriter::new(io::stderr),
    };
    let layer = layer_fmt::layer()
        .with_writer(writer)
        .with_ansi(config.file.is_none())
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json().flatten_event(true)).try_init(),
    };
    installed.map_err(|_| LogError::AlreadyInitialized)?;

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        file = ?config.file,
        "logging initialized"
    );
    Ok(())
}
