//! Source document shapes and the load-time adapter.
//!
//! The graph document has grown several shapes for the same data. This
//! module accepts a closed set of them and turns everything into
//! [`EntityName`] lists and [`EdgePair`] lists in one pass. Nothing after
//! load inspects shapes again.
//!
//! Recognized entity entries:
//! - `"Billing"`
//! - `{"name": "Billing", ...}` (extra fields ignored)
//!
//! Recognized edge entries (each side a name or a `{"name": ..}` record):
//! - `["Billing", "Charge"]`
//! - `{"side_a": {"name": "Billing"}, "side_b": {"name": "Charge"}}`
//!
//! Nested declarations are expanded into edges as well: an application
//! record may carry `functions`, and any function record may carry
//! `variables`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::normalize::NameKey;
use super::types::{EdgePair, EntityKind, EntityName, Relation};

/// A name, either bare or wrapped in a record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawName {
    Plain(String),
    Record { name: String },
}

impl RawName {
    /// Read a name from a string or a mapping. Derived struct impls also
    /// accept sequences, so those are rejected before serde sees them.
    fn from_value(value: &Value) -> Option<String> {
        if !matches!(value, Value::String(_) | Value::Object(_)) {
            return None;
        }
        match RawName::deserialize(value).ok()? {
            RawName::Plain(name) | RawName::Record { name } => Some(name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEdge {
    Pair(Value, Value),
    Sides { side_a: Value, side_b: Value },
}

impl RawEdge {
    fn from_value(value: &Value) -> Option<(String, String)> {
        let edge = match value {
            Value::Array(_) | Value::Object(_) => RawEdge::deserialize(value).ok()?,
            _ => return None,
        };
        let (a, b) = match edge {
            RawEdge::Pair(a, b) | RawEdge::Sides { side_a: a, side_b: b } => (a, b),
        };
        Some((RawName::from_value(&a)?, RawName::from_value(&b)?))
    }
}

#[derive(Debug, Deserialize)]
struct EntityRecord {
    name: String,
    #[serde(default)]
    functions: Value,
    #[serde(default)]
    variables: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntity {
    Plain(String),
    Record(EntityRecord),
}

impl RawEntity {
    fn from_value(value: &Value) -> Option<RawEntity> {
        match value {
            Value::String(_) | Value::Object(_) => RawEntity::deserialize(value).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    applications: Value,
    #[serde(default)]
    functions: Value,
    #[serde(default)]
    variables: Value,
    #[serde(default)]
    app_function_edges: Value,
    #[serde(default)]
    function_variable_edges: Value,
}

/// Output of the adapter pass, in canonical form.
#[derive(Debug, Default)]
pub(crate) struct AdaptedGraph {
    pub applications: Vec<EntityName>,
    pub functions: Vec<EntityName>,
    pub variables: Vec<EntityName>,
    pub app_functions: Vec<EdgePair>,
    pub function_variables: Vec<EdgePair>,
    pub skipped: usize,
}

/// Entities and edges found inside records rather than in their own sections.
#[derive(Default)]
struct Nested {
    functions: Vec<EntityName>,
    variables: Vec<EntityName>,
    app_functions: Vec<EdgePair>,
    function_variables: Vec<EdgePair>,
}

/// Adapt a parsed document. Fails only when the top level is not a mapping.
pub(crate) fn adapt(document: Value) -> Result<AdaptedGraph, String> {
    let raw: RawDocument = match document {
        Value::Object(_) => serde_json::from_value(document).map_err(|e| e.to_string())?,
        other => {
            return Err(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))
        }
    };

    let mut adapter = Adapter::default();
    let mut nested = Nested::default();

    let applications = adapter.read_entities(
        "applications",
        &raw.applications,
        EntityKind::Application,
        &mut nested,
    );
    let functions =
        adapter.read_entities("functions", &raw.functions, EntityKind::Function, &mut nested);
    let variables =
        adapter.read_entities("variables", &raw.variables, EntityKind::Variable, &mut nested);

    let mut app_functions = adapter.read_edges(Relation::AppFunction, &raw.app_function_edges);
    let mut function_variables =
        adapter.read_edges(Relation::FunctionVariable, &raw.function_variable_edges);

    // Nested edges come after the explicit lists.
    app_functions.extend(nested.app_functions);
    function_variables.extend(nested.function_variables);

    let functions = merge_declared(functions, nested.functions);
    let variables = merge_declared(variables, nested.variables);

    Ok(AdaptedGraph {
        applications,
        functions,
        variables,
        app_functions,
        function_variables,
        skipped: adapter.skipped,
    })
}

/// Append nested entities whose key is not declared yet. Declared lists are
/// kept exactly as written.
fn merge_declared(mut declared: Vec<EntityName>, nested: Vec<EntityName>) -> Vec<EntityName> {
    let mut seen: HashSet<NameKey> = declared.iter().map(|n| n.key.clone()).collect();
    for name in nested {
        if seen.insert(name.key.clone()) {
            declared.push(name);
        }
    }
    declared
}

#[derive(Default)]
struct Adapter {
    skipped: usize,
}

impl Adapter {
    fn skip(&mut self, section: &str, index: usize) {
        debug!(section, index, "skipping malformed entry");
        self.skipped += 1;
    }

    /// Wrap a name, rejecting ones that normalize to nothing.
    fn name(&mut self, section: &str, index: usize, raw: String) -> Option<EntityName> {
        let name = EntityName::new(raw);
        if name.key.is_empty() {
            self.skip(section, index);
            return None;
        }
        Some(name)
    }

    fn read_entities(
        &mut self,
        section: &str,
        value: &Value,
        kind: EntityKind,
        nested: &mut Nested,
    ) -> Vec<EntityName> {
        let mut names = Vec::new();
        for (index, entry) in entries(value, section).iter().enumerate() {
            let record = match RawEntity::from_value(entry) {
                Some(RawEntity::Plain(raw)) => {
                    names.extend(self.name(section, index, raw));
                    continue;
                }
                Some(RawEntity::Record(record)) => record,
                None => {
                    self.skip(section, index);
                    continue;
                }
            };

            let Some(name) = self.name(section, index, record.name) else {
                continue;
            };
            let path = format!("{}[{}]", section, index);
            match kind {
                EntityKind::Application => {
                    self.expand_functions(&path, &name, &record.functions, nested)
                }
                EntityKind::Function => {
                    self.expand_variables(&path, &name, &record.variables, nested)
                }
                EntityKind::Variable => {}
            }
            names.push(name);
        }
        names
    }

    fn expand_functions(
        &mut self,
        path: &str,
        app: &EntityName,
        value: &Value,
        nested: &mut Nested,
    ) {
        let section = format!("{}.functions", path);
        for (index, entry) in entries(value, &section).iter().enumerate() {
            let (raw, variables) = match RawEntity::from_value(entry) {
                Some(RawEntity::Plain(raw)) => (raw, Value::Null),
                Some(RawEntity::Record(record)) => (record.name, record.variables),
                None => {
                    self.skip(&section, index);
                    continue;
                }
            };
            let Some(function) = self.name(&section, index, raw) else {
                continue;
            };
            nested.app_functions.push(EdgePair {
                source: app.clone(),
                target: function.clone(),
            });
            let fn_path = format!("{}[{}]", section, index);
            self.expand_variables(&fn_path, &function, &variables, nested);
            nested.functions.push(function);
        }
    }

    fn expand_variables(
        &mut self,
        path: &str,
        function: &EntityName,
        value: &Value,
        nested: &mut Nested,
    ) {
        let section = format!("{}.variables", path);
        for (index, entry) in entries(value, &section).iter().enumerate() {
            let raw = match RawName::from_value(entry) {
                Some(raw) => raw,
                None => {
                    self.skip(&section, index);
                    continue;
                }
            };
            let Some(variable) = self.name(&section, index, raw) else {
                continue;
            };
            nested.function_variables.push(EdgePair {
                source: function.clone(),
                target: variable.clone(),
            });
            nested.variables.push(variable);
        }
    }

    fn read_edges(&mut self, relation: Relation, value: &Value) -> Vec<EdgePair> {
        let section = relation.section();
        let mut pairs = Vec::new();
        for (index, entry) in entries(value, section).iter().enumerate() {
            let (a, b) = match RawEdge::from_value(entry) {
                Some(sides) => sides,
                None => {
                    self.skip(section, index);
                    continue;
                }
            };
            let pair = EdgePair::new(a, b);
            if pair.source.key.is_empty() || pair.target.key.is_empty() {
                self.skip(section, index);
                continue;
            }
            pairs.push(pair);
        }
        pairs
    }
}

/// List entries of a section. Absent and null sections are empty; any other
/// non-list value is treated as empty too.
fn entries<'a>(value: &'a Value, section: &str) -> &'a [Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Null => &[],
        other => {
            warn!(section, found = value_kind(other), "section is not a list, ignoring it");
            &[]
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn displays(names: &[EntityName]) -> Vec<&str> {
        names.iter().map(|n| n.as_str()).collect()
    }

    fn pairs(edges: &[EdgePair]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    #[test]
    fn test_plain_and_record_entities() {
        let graph = adapt(json!({
            "applications": ["Billing", {"name": "Shipping", "owner": "ops"}],
            "functions": [{"name": "Charge"}],
        }))
        .unwrap();

        assert_eq!(displays(&graph.applications), vec!["Billing", "Shipping"]);
        assert_eq!(displays(&graph.functions), vec!["Charge"]);
        assert!(graph.variables.is_empty());
        assert_eq!(graph.skipped, 0);
    }

    #[test]
    fn test_mixed_edge_shapes() {
        let graph = adapt(json!({
            "app_function_edges": [
                ["Billing", "Charge"],
                {"side_a": {"name": "Billing"}, "side_b": {"name": "Refund"}},
                [{"name": "Shipping"}, "Charge"],
                {"side_a": "Shipping", "side_b": {"name": "Track", "line": 4}},
            ],
        }))
        .unwrap();

        assert_eq!(
            pairs(&graph.app_functions),
            vec![
                ("Billing", "Charge"),
                ("Billing", "Refund"),
                ("Shipping", "Charge"),
                ("Shipping", "Track"),
            ]
        );
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let graph = adapt(json!({
            "applications": ["Billing", 42, {"title": "no name"}, "  "],
            "function_variable_edges": [
                ["Charge", "amount"],
                ["only one"],
                ["a", "b", "c"],
                {"side_a": {"name": "Charge"}},
                "Charge->amount",
                null,
                ["Charge", "currency"],
            ],
        }))
        .unwrap();

        assert_eq!(displays(&graph.applications), vec!["Billing"]);
        assert_eq!(
            pairs(&graph.function_variables),
            vec![("Charge", "amount"), ("Charge", "currency")]
        );
        assert_eq!(graph.skipped, 3 + 5);
    }

    #[test]
    fn test_list_shaped_records_skipped() {
        let graph = adapt(json!({
            "applications": [
                ["Billing", ["Charge", "Refund"]],
                ["Shop"],
                {"name": "Shipping", "functions": [["Track", ["parcel"]], "Label"]},
            ],
            "functions": [["Charge", ["amount"]]],
            "variables": [["amount"]],
            "app_function_edges": [[["Billing"], "Charge"]],
            "function_variable_edges": [{"side_a": ["Charge"], "side_b": "amount"}],
        }))
        .unwrap();

        assert_eq!(displays(&graph.applications), vec!["Shipping"]);
        assert_eq!(displays(&graph.functions), vec!["Label"]);
        assert!(graph.variables.is_empty());
        assert_eq!(pairs(&graph.app_functions), vec![("Shipping", "Label")]);
        assert!(graph.function_variables.is_empty());
        assert_eq!(graph.skipped, 2 + 1 + 1 + 1 + 1 + 1);
    }

    #[test]
    fn test_nested_declarations_expand_to_edges() {
        let graph = adapt(json!({
            "applications": [{
                "name": "Billing",
                "functions": [
                    {"name": "Charge", "variables": ["amount", {"name": "currency"}]},
                    "Refund",
                ],
            }],
            "functions": [{"name": "Audit", "variables": ["actor"]}],
            "app_function_edges": [["Billing", "Audit"]],
        }))
        .unwrap();

        // Explicit edges first, nested ones after.
        assert_eq!(
            pairs(&graph.app_functions),
            vec![("Billing", "Audit"), ("Billing", "Charge"), ("Billing", "Refund")]
        );
        assert_eq!(
            pairs(&graph.function_variables),
            vec![("Charge", "amount"), ("Charge", "currency"), ("Audit", "actor")]
        );
        assert_eq!(displays(&graph.functions), vec!["Audit", "Charge", "Refund"]);
        assert_eq!(displays(&graph.variables), vec!["amount", "currency", "actor"]);
    }

    #[test]
    fn test_nested_entities_do_not_duplicate_declared() {
        let graph = adapt(json!({
            "applications": [{"name": "Billing", "functions": ["charge"]}],
            "functions": ["Charge", "Charge"],
        }))
        .unwrap();

        // Declared list stays as written; the nested "charge" is already known.
        assert_eq!(displays(&graph.functions), vec!["Charge", "Charge"]);
        assert_eq!(pairs(&graph.app_functions), vec![("Billing", "charge")]);
    }

    #[test]
    fn test_absent_and_odd_sections() {
        let graph = adapt(json!({
            "applications": null,
            "functions": "not a list",
            "unrelated": [1, 2, 3],
        }))
        .unwrap();
        assert!(graph.applications.is_empty());
        assert!(graph.functions.is_empty());
        assert!(graph.app_functions.is_empty());
        assert_eq!(graph.skipped, 0);

        let graph = adapt(json!({})).unwrap();
        assert!(graph.variables.is_empty());
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        assert!(adapt(json!([1, 2])).is_err());
        assert!(adapt(Value::Null).is_err());
        let err = adapt(json!("graph")).unwrap_err();
        assert!(err.contains("a string"));
    }
}
