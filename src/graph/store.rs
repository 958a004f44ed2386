//! Graph store — loads the source document once and holds it read-only.
//!
//! JSON and YAML sources are both accepted. Parsing goes through
//! `serde_json::Value` so that the adapter in [`super::document`] sees one
//! representation regardless of format.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::document::{adapt, AdaptedGraph};
use super::types::{EdgePair, EntityName, GraphStats};
use crate::error::{AppGraphError, Result};

/// Serialization format of a graph source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// `.yaml` / `.yml` are YAML, everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

/// The loaded graph: three entity lists and two edge lists, all in
/// canonical form. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    applications: Vec<EntityName>,
    functions: Vec<EntityName>,
    variables: Vec<EntityName>,
    app_functions: Vec<EdgePair>,
    function_variables: Vec<EdgePair>,
    skipped: usize,
}

impl GraphStore {
    /// Read and parse a graph document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading graph");

        let text = fs::read_to_string(path).map_err(|source| AppGraphError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::parse(&text, SourceFormat::from_path(path)).map_err(|message| {
            AppGraphError::Parse {
                path: path.to_path_buf(),
                message,
            }
        })?;

        let stats = store.stats();
        debug!(
            applications = stats.application_count,
            functions = stats.function_count,
            variables = stats.variable_count,
            app_function_edges = stats.app_function_edges,
            function_variable_edges = stats.function_variable_edges,
            skipped = stats.skipped_entries,
            "graph loaded"
        );

        Ok(store)
    }

    /// Parse a graph document held in memory.
    pub fn from_str(text: &str, format: SourceFormat) -> Result<Self> {
        Self::parse(text, format).map_err(|message| AppGraphError::Parse {
            path: PathBuf::from("<memory>"),
            message,
        })
    }

    fn parse(text: &str, format: SourceFormat) -> std::result::Result<Self, String> {
        let value: Value = match format {
            SourceFormat::Json => {
                serde_json::from_str(text).map_err(|e| format!("json: {}", e))?
            }
            SourceFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| format!("yaml: {}", e))?
            }
        };
        Ok(Self::from_adapted(adapt(value)?))
    }

    fn from_adapted(graph: AdaptedGraph) -> Self {
        Self {
            applications: graph.applications,
            functions: graph.functions,
            variables: graph.variables,
            app_functions: graph.app_functions,
            function_variables: graph.function_variables,
            skipped: graph.skipped,
        }
    }

    pub fn applications(&self) -> &[EntityName] {
        &self.applications
    }

    pub fn functions(&self) -> &[EntityName] {
        &self.functions
    }

    pub fn variables(&self) -> &[EntityName] {
        &self.variables
    }

    /// Application -> function pairs, in source order.
    pub fn app_function_edges(&self) -> &[EdgePair] {
        &self.app_functions
    }

    /// Function -> variable pairs, in source order.
    pub fn function_variable_edges(&self) -> &[EdgePair] {
        &self.function_variables
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            application_count: self.applications.len(),
            function_count: self.functions.len(),
            variable_count: self.variables.len(),
            app_function_edges: self.app_functions.len(),
            function_variable_edges: self.function_variables.len(),
            skipped_entries: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const BILLING: &str = r#"{
        "applications": [{"name": "Billing"}],
        "functions": [{"name": "Charge"}],
        "variables": [{"name": "amount"}],
        "app_function_edges": [["Billing", "Charge"]],
        "function_variable_edges": [["Charge", "amount"]]
    }"#;

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph_data.json");
        fs::write(&path, BILLING).unwrap();

        let store = GraphStore::load(&path).unwrap();
        assert_eq!(store.applications()[0].as_str(), "Billing");
        assert_eq!(store.functions()[0].as_str(), "Charge");
        assert_eq!(store.variables()[0].as_str(), "amount");
        assert_eq!(store.app_function_edges().len(), 1);
        assert_eq!(store.function_variable_edges()[0].target.as_str(), "amount");
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.yml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "applications:\n  - Billing\napp_function_edges:\n  - [Billing, Charge]\n  - side_a: {{name: Billing}}\n    side_b: {{name: Refund}}"
        )
        .unwrap();

        let store = GraphStore::load(&path).unwrap();
        let targets: Vec<&str> = store
            .app_function_edges()
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(targets, vec!["Charge", "Refund"]);
        assert!(store.functions().is_empty());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = GraphStore::load(Path::new("/nonexistent/graph_data.json")).unwrap_err();
        assert!(matches!(err, AppGraphError::Load { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph_data.json");
        fs::write(&path, "{ \"applications\": [").unwrap();

        let err = GraphStore::load(&path).unwrap_err();
        assert!(matches!(err, AppGraphError::Parse { .. }));
    }

    #[test]
    fn test_empty_sources_are_parse_errors() {
        assert!(GraphStore::from_str("", SourceFormat::Json).is_err());
        assert!(GraphStore::from_str("[]", SourceFormat::Json).is_err());
        assert!(GraphStore::from_str("", SourceFormat::Yaml).is_err());
    }

    #[test]
    fn test_empty_mapping_is_empty_graph() {
        let store = GraphStore::from_str("{}", SourceFormat::Json).unwrap();
        assert_eq!(store.stats(), GraphStats::default());
    }

    #[test]
    fn test_stats() {
        let store = GraphStore::from_str(BILLING, SourceFormat::Json).unwrap();
        let stats = store.stats();
        assert_eq!(stats.application_count, 1);
        assert_eq!(stats.function_count, 1);
        assert_eq!(stats.variable_count, 1);
        assert_eq!(stats.app_function_edges, 1);
        assert_eq!(stats.function_variable_edges, 1);
        assert_eq!(stats.skipped_entries, 0);
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("g.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("g.YML")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("g.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("graph")), SourceFormat::Json);
    }
}
