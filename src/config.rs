//! Toolkit configuration.
//!
//! Configuration is plain TOML:
//!
//! ```toml
//! [render]
//! marker_attribute = "data-component-id"
//!
//! [log]
//! level = "debug"
//! ansi = false
//! ```
//!
//! Every field is optional. [`install`] applies the render settings to the process; the first
//! installed configuration wins.

use std::{fs, path::Path, sync::OnceLock};

use serde::{Deserialize, Serialize};
use sprig_core::{Error, Result};

/// Name of the attribute that carries a component's identity when nothing is configured.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-component-id";

static MARKER_ATTRIBUTE: OnceLock<String> = OnceLock::new();

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render cycle settings.
    pub render: RenderConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// Render cycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Attribute written on every top-level element a component renders.
    pub marker_attribute: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
        }
    }
}

/// Logging settings consumed by [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// Whether to emit ANSI colours.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: false,
        }
    }
}

impl Config {
    /// Parses configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or an invalid marker attribute name.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Serializes back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        sprig_core::validate_name(&self.render.marker_attribute).map_err(|_| {
            Error::Config(format!(
                "`{}` is not a valid attribute name",
                self.render.marker_attribute
            ))
        })
    }
}

/// Applies `config` to the process. Returns `false` when a configuration was already installed.
///
/// # Errors
///
/// Returns [`Error::Config`] when the marker attribute is not a valid attribute name; nothing is
/// installed in that case.
pub fn install(config: &Config) -> Result<bool> {
    config.validate()?;
    Ok(MARKER_ATTRIBUTE
        .set(config.render.marker_attribute.to_ascii_lowercase())
        .is_ok())
}

/// Returns the identity marker attribute in effect.
pub fn marker_attribute() -> &'static str {
    MARKER_ATTRIBUTE
        .get()
        .map_or(DEFAULT_MARKER_ATTRIBUTE, String::as_str)
}
