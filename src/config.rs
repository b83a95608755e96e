//! Tracer configuration, loaded from YAML
//!
//! ```yaml
//! connector:
//!   color: "#0000ff"
//!   width: 3
//!   shape: line
//! ```

use crate::trace::ConnectorStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Styling for every connector the tracer draws
    pub connector: ConnectorStyle,
}

impl TracerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// `~/.config/formula-tracer/config.yaml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("formula-tracer").join("config.yaml"))
    }

    /// Load `explicit` if given (it must exist), else the default file if present,
    /// else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading default config");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }
}
