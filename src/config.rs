//! Configuration: The read-only snapshot atoms are built from.
//!
//! Loaded once at startup (usually from TOML) and passed explicitly to
//! whatever creates atoms; nothing reads configuration from global state.
//!
//! ```toml
//! [theme]
//! name = "custom"
//! [theme.components.messages]
//! foreground_color = "white"
//! background_color = "#000080"
//!
//! [layout]
//! messages = { top = "0%", left = "0%", width = "100%", height = "100%-3" }
//! messages_visible = true
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! file = "atoms.log"
//! ```

use crate::error::{Error, Result};
use crate::layout::{Dimension, Geometry};
use crate::logging::LogConfig;
use crate::theme::ThemeData;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default geometry of the UI's atoms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Where the message pane sits before any sibling reflows it.
    pub messages: Geometry,
    /// Whether the message pane starts visible.
    pub messages_visible: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            messages: Geometry {
                height: Dimension::relative(100.0, -3),
                padding: 1,
                ..Geometry::default()
            },
            messages_visible: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial theme.
    pub theme: ThemeData,
    /// Initial atom geometry.
    pub layout: LayoutConfig,
    /// Log subscriber settings.
    pub logging: LogConfig,
}

impl Config {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), theme = %config.theme.name, "config loaded");
        Ok(config)
    }
}
