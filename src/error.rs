//! Error types for the atom engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the atom engine and its display sinks.
///
/// Most engine conditions (lock imbalance, out-of-range scroll percentages,
/// empty batches) are absorbed locally and never surface here; what remains
/// are lookups of atoms that do not exist, malformed configuration values and
/// I/O failures of the display sink.
#[derive(Debug, Error)]
pub enum Error {
    /// No atom with this name or id is registered.
    #[error("unknown atom: {0}")]
    UnknownAtom(String),

    /// An atom with this name is already registered.
    #[error("atom `{0}` is already registered")]
    DuplicateAtom(String),

    /// `init` was invoked a second time for the same atom.
    #[error("atom `{0}` was already initialized")]
    AlreadyInitialized(String),

    /// A geometry value could not be parsed.
    #[error("invalid dimension `{input}`: {reason}")]
    InvalidDimension {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A color value could not be parsed.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// The display sink failed to apply state or repaint.
    #[error("display error: {0}")]
    Display(#[from] io::Error),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
