//! Configuration — `appgraph.toml`.
//!
//! ```toml
//! [graph]
//! path = "graph_data.json"
//!
//! [query]
//! suggestions = true
//! max_distance = 2
//!
//! [log]
//! level = "info"
//! ```
//!
//! Every field is optional. A missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppGraphError, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "appgraph.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub query: QueryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Source document. Relative paths are resolved against the config file.
    pub path: PathBuf,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("graph_data.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub suggestions: bool,
    pub max_distance: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            suggestions: true,
            max_distance: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .map_err(|e| AppGraphError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&text)?;

        if config.graph.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.graph.path = dir.join(&config.graph.path);
            }
        }

        debug!(path = %path.display(), graph = %config.graph.path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AppGraphError::Config(e.to_string()))
    }
}
