//! Application configuration.
//!
//! The configuration is loaded from a JSON file in the per-user config
//! directory (see [`config_dir`]).  Every field is optional; a missing file
//! or a minimal `{}` means compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "strategy": "clockwise",
//!   "enumeration": {
//!     "settle_delay_ms": 50,
//!     "timeout_ms": 1000,
//!     "channel_capacity": 16,
//!     "confirm_stable": false
//!   }
//! }
//! ```

use crate::command::Strategy;
use crate::enumerator::EnumerationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ordering used when no command is given on the command line.
    #[serde(default)]
    pub strategy: Strategy,

    /// Display enumeration settings.
    #[serde(default)]
    pub enumeration: EnumerationConfig,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

/// Resolve the config directory.
///
/// `%APPDATA%\monswitch` on Windows; elsewhere `$XDG_CONFIG_HOME/monswitch`,
/// falling back to `$HOME/.config/monswitch`.
pub fn config_dir() -> PathBuf {
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("monswitch");
    }
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("monswitch")
}

/// Path of the config file inside [`config_dir`].
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}
