//! Query engine — the five navigation queries over a loaded graph.
//!
//! Every query name is turned into a [`NameKey`] once on entry and matched
//! against the keys computed at load time. Unknown names give empty
//! results; nothing here returns an error.

use std::path::Path;
use tracing::debug;

use super::suggest;
use super::types::{AppStructure, Lookup, LookupResponse, StatsResponse, StructureResponse};
use crate::config::QueryConfig;
use crate::error::Result;
use crate::graph::{EntityKind, GraphStats, GraphStore, NameKey, RelationGraph};

/// Query-time options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Attach nearest-name suggestions to empty responses.
    pub suggestions: bool,
    /// Max edit distance between normalized names for a suggestion.
    pub max_distance: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            suggestions: true,
            max_distance: 2,
        }
    }
}

impl From<&QueryConfig> for QueryOptions {
    fn from(config: &QueryConfig) -> Self {
        Self {
            suggestions: config.suggestions,
            max_distance: config.max_distance,
        }
    }
}

/// Read-only query engine. Safe to share between threads: nothing mutates
/// the graph after construction.
#[derive(Debug)]
pub struct QueryEngine {
    store: GraphStore,
    graph: RelationGraph,
    options: QueryOptions,
}

impl QueryEngine {
    pub fn new(store: GraphStore) -> Self {
        Self::with_options(store, QueryOptions::default())
    }

    pub fn with_options(store: GraphStore, options: QueryOptions) -> Self {
        let graph = RelationGraph::build(&store);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "relation graph indexed"
        );
        Self {
            store,
            graph,
            options,
        }
    }

    /// Load a graph document and index it.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(GraphStore::load(path)?))
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Functions used by an application, in edge order.
    pub fn functions_for_app(&self, app: &str) -> Vec<String> {
        self.run(Lookup::FunctionsForApp, app)
    }

    /// Applications using a function, in edge order.
    pub fn apps_for_function(&self, function: &str) -> Vec<String> {
        self.run(Lookup::AppsForFunction, function)
    }

    /// Variables used by a function, in edge order.
    pub fn variables_for_function(&self, function: &str) -> Vec<String> {
        self.run(Lookup::VariablesForFunction, function)
    }

    /// Functions using a variable, in edge order.
    pub fn functions_for_variable(&self, variable: &str) -> Vec<String> {
        self.run(Lookup::FunctionsForVariable, variable)
    }

    /// Each function of an application mapped to its variables.
    ///
    /// Built from [`Self::functions_for_app`] and
    /// [`Self::variables_for_function`], so it always agrees with them.
    pub fn app_structure(&self, app: &str) -> AppStructure {
        let mut structure = AppStructure::default();
        for function in self.functions_for_app(app) {
            if structure.contains(&function) {
                continue;
            }
            let variables = self.variables_for_function(&function);
            structure.insert_new(function, variables);
        }
        structure
    }

    /// Run one of the four single-relation lookups.
    pub fn run(&self, lookup: Lookup, name: &str) -> Vec<String> {
        let key = NameKey::new(name);
        if key.is_empty() {
            debug!(%lookup, name, "empty name after normalization");
            return Vec::new();
        }

        let results: Vec<String> = self
            .graph
            .related(lookup.input_kind(), &key, lookup.relation(), lookup.direction())
            .into_iter()
            .map(String::from)
            .collect();

        debug!(%lookup, name, key = %key, hits = results.len(), "lookup");
        results
    }

    /// Declared applications, in document order.
    pub fn applications(&self) -> Vec<String> {
        self.store
            .applications()
            .iter()
            .map(|a| a.display.clone())
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        self.store.stats()
    }

    /// Closest known name of `kind` when `name` itself matches nothing.
    ///
    /// Returns `None` for exact (normalized) matches: there is nothing to
    /// suggest when the name already resolves.
    pub fn suggest(&self, kind: EntityKind, name: &str) -> Option<String> {
        let key = NameKey::new(name);
        if key.is_empty() || self.graph.find(kind, &key).is_some() {
            return None;
        }
        let hit = suggest::nearest(&key, self.graph.entities(kind), self.options.max_distance)?;
        debug!(%kind, name, suggestion = %hit.name, "suggesting nearest name");
        Some(hit.name.clone())
    }

    /// A lookup wrapped with its outcome and, when empty, a suggestion.
    pub fn lookup(&self, lookup: Lookup, name: &str) -> LookupResponse {
        let results = self.run(lookup, name);
        let found = !results.is_empty();
        LookupResponse {
            query: name.to_string(),
            lookup,
            found,
            suggestion: self.suggestion_for(found, lookup.input_kind(), name),
            results,
        }
    }

    /// [`Self::app_structure`] wrapped with its outcome.
    pub fn structure(&self, app: &str) -> StructureResponse {
        let structure = self.app_structure(app);
        let found = !structure.is_empty();
        StructureResponse {
            query: app.to_string(),
            found,
            suggestion: self.suggestion_for(found, EntityKind::Application, app),
            structure,
        }
    }

    pub fn stats_response(&self) -> StatsResponse {
        StatsResponse {
            stats: self.stats(),
        }
    }

    fn suggestion_for(&self, found: bool, kind: EntityKind, name: &str) -> Option<String> {
        if found || !self.options.suggestions {
            return None;
        }
        self.suggest(kind, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SourceFormat;

    fn engine(json: &str) -> QueryEngine {
        QueryEngine::new(GraphStore::from_str(json, SourceFormat::Json).unwrap())
    }

    fn billing() -> QueryEngine {
        engine(
            r#"{
                "applications": [{"name": "Billing"}],
                "functions": [{"name": "Charge"}],
                "variables": [{"name": "amount"}],
                "app_function_edges": [["Billing", "Charge"]],
                "function_variable_edges": [["Charge", "amount"]]
            }"#,
        )
    }

    #[test]
    fn test_billing_fixture() {
        let q = billing();
        assert_eq!(q.functions_for_app("billing"), vec!["Charge"]);
        assert_eq!(q.apps_for_function("CHARGE"), vec!["Billing"]);
        assert_eq!(q.variables_for_function("Charge"), vec!["amount"]);
        assert_eq!(q.functions_for_variable("Amount"), vec!["Charge"]);

        let s = q.app_structure("Billing");
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("Charge"), Some(&["amount".to_string()][..]));
    }

    #[test]
    fn test_unknown_names_are_empty() {
        let q = billing();
        assert!(q.functions_for_app("DoesNotExist").is_empty());
        assert!(q.apps_for_function("DoesNotExist").is_empty());
        assert!(q.variables_for_function("DoesNotExist").is_empty());
        assert!(q.functions_for_variable("DoesNotExist").is_empty());
        assert!(q.app_structure("DoesNotExist").is_empty());
        assert!(q.functions_for_app("   ").is_empty());
    }

    #[test]
    fn test_wrong_kind_does_not_match() {
        let q = billing();
        // "Charge" is a function, not an application.
        assert!(q.functions_for_app("Charge").is_empty());
        assert!(q.variables_for_function("Billing").is_empty());
    }

    #[test]
    fn test_outputs_keep_stored_spelling() {
        let q = engine(
            r#"{
                "app_function_edges": [["Order Service", "placeOrder"]],
                "function_variable_edges": [["place-order", "Cart Total"]]
            }"#,
        );
        assert_eq!(q.functions_for_app("order_service"), vec!["placeOrder"]);
        assert_eq!(q.variables_for_function("PlaceOrder"), vec!["Cart Total"]);
        assert_eq!(q.functions_for_variable("cart-total"), vec!["place-order"]);

        let s = q.app_structure("OrderService");
        assert_eq!(s.get("placeOrder"), Some(&["Cart Total".to_string()][..]));
    }

    #[test]
    fn test_duplicate_edges_preserved() {
        let q = engine(
            r#"{
                "app_function_edges": [["A", "f"], ["A", "g"], ["A", "f"]],
                "function_variable_edges": [["f", "x"], ["f", "x"]]
            }"#,
        );
        assert_eq!(q.functions_for_app("A"), vec!["f", "g", "f"]);
        assert_eq!(q.variables_for_function("f"), vec!["x", "x"]);
        assert_eq!(q.apps_for_function("f"), vec!["A", "A"]);

        // The structure has one key per function; values match the lookup.
        let s = q.app_structure("A");
        assert_eq!(s.functions().collect::<Vec<_>>(), vec!["f", "g"]);
        assert_eq!(s.get("f").unwrap(), q.variables_for_function("f").as_slice());
        assert!(s.get("g").unwrap().is_empty());
    }

    #[test]
    fn test_applications_and_stats() {
        let q = engine(
            r#"{
                "applications": ["Billing", {"name": "Shipping"}, 7],
                "app_function_edges": [["Billing", "Charge"]]
            }"#,
        );
        assert_eq!(q.applications(), vec!["Billing", "Shipping"]);
        let stats = q.stats();
        assert_eq!(stats.application_count, 2);
        assert_eq!(stats.app_function_edges, 1);
        assert_eq!(stats.skipped_entries, 1);
        assert_eq!(q.stats_response().stats, stats);
    }

    #[test]
    fn test_suggestions() {
        let q = billing();
        assert_eq!(
            q.suggest(EntityKind::Function, "Chrage"),
            Some("Charge".to_string())
        );
        assert_eq!(q.suggest(EntityKind::Function, "charge"), None);
        assert_eq!(q.suggest(EntityKind::Variable, "Charge"), None);

        let response = q.lookup(Lookup::VariablesForFunction, "Chargee");
        assert!(!response.found);
        assert!(response.results.is_empty());
        assert_eq!(response.suggestion.as_deref(), Some("Charge"));

        let response = q.lookup(Lookup::VariablesForFunction, "charge");
        assert!(response.found);
        assert_eq!(response.results, vec!["amount"]);
        assert!(response.suggestion.is_none());

        let response = q.structure("Biling");
        assert!(!response.found);
        assert_eq!(response.suggestion.as_deref(), Some("Billing"));
    }

    #[test]
    fn test_suggestions_disabled() {
        let store = GraphStore::from_str(
            r#"{"app_function_edges": [["Billing", "Charge"]]}"#,
            SourceFormat::Json,
        )
        .unwrap();
        let q = QueryEngine::with_options(
            store,
            QueryOptions {
                suggestions: false,
                max_distance: 2,
            },
        );
        assert!(!q.options().suggestions);
        assert_eq!(q.store().stats().app_function_edges, 1);
        assert!(q.lookup(Lookup::FunctionsForApp, "Biling").suggestion.is_none());
        // Direct calls still work.
        assert_eq!(
            q.suggest(EntityKind::Application, "Biling"),
            Some("Billing".to_string())
        );
    }
}
