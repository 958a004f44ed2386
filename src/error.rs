//! Error types for appgraph.
//!
//! Only loading (and configuration) can fail. Lookups for unknown names
//! return empty results, so there is no "not found" variant here.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppGraphError>;

#[derive(Debug, Error)]
pub enum AppGraphError {
    /// The graph source could not be read.
    #[error("cannot read graph source {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph source was read but is not a structured document.
    #[error("cannot parse graph source {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppGraphError {
    /// True for the failures that must stop a caller from serving queries.
    pub fn is_load_error(&self) -> bool {
        matches!(self, AppGraphError::Load { .. } | AppGraphError::Parse { .. })
    }
}
