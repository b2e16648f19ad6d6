//! # Runtime Configuration Module
//!
//! Where routes are discovered from, loaded from environment variables or a config file.
//!
//! ## Environment Variables
//!
//! ### `FSR_ROUTES_DIR`
//!
//! Root of the route tree. Default: `routes`
//!
//! ### `FSR_ROUTE_PREFIX`
//!
//! Prefix prepended to every discovered path (e.g. `api/v1`). Unset or empty means no prefix.
//!
//! ## Config File
//!
//! [`RuntimeConfig::from_file`] reads the same settings from YAML (`.yaml`/`.yml`) or JSON
//! (`.json`). Missing keys take their defaults:
//!
//! ```yaml
//! routes_dir: src/routes
//! route_prefix: api
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fsrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! let table = RouteTable::from_dir(&config.routes_dir, config.prefix(), &modules)?;
//! ```

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_ROUTES_DIR: &str = "routes";

/// Errors raised while loading a config file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io { path: PathBuf, source: std::io::Error },
    /// The extension is not one of yaml/yml/json
    UnsupportedFormat { path: PathBuf },
    /// The content does not parse
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Config error: cannot read '{}': {}", path.display(), source)
            }
            ConfigError::UnsupportedFormat { path } => write!(
                f,
                "Config error: '{}' has an unsupported extension. Expected .yaml, .yml or .json",
                path.display()
            ),
            ConfigError::Parse { path, message } => {
                write!(f, "Config error: cannot parse '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Route discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Root of the route tree (default: `routes`)
    pub routes_dir: PathBuf,
    /// Path prefix for every route
    pub route_prefix: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            routes_dir: PathBuf::from(DEFAULT_ROUTES_DIR),
            route_prefix: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let routes_dir = lookup("FSR_ROUTES_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_ROUTES_DIR), PathBuf::from);
        let route_prefix = lookup("FSR_ROUTE_PREFIX").filter(|v| !v.trim().is_empty());
        RuntimeConfig { routes_dir, route_prefix }
    }

    /// Load configuration from a YAML or JSON file, chosen by extension.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match ext.as_deref() {
            Some("yaml" | "yml") => {
                let content = read(path)?;
                serde_yaml::from_str(&content).map_err(|e| parse_err(e.to_string()))
            }
            Some("json") => {
                let content = read(path)?;
                serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The prefix to hand to discovery, with empty values treated as none.
    pub fn prefix(&self) -> Option<&str> {
        self.route_prefix.as_deref().filter(|p| !p.trim().is_empty())
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
