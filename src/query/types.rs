//! Query result and response types.

use petgraph::Direction;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::graph::{EntityKind, GraphStats, Relation};

/// The four single-relation lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    FunctionsForApp,
    AppsForFunction,
    VariablesForFunction,
    FunctionsForVariable,
}

impl Lookup {
    pub const ALL: [Lookup; 4] = [
        Lookup::FunctionsForApp,
        Lookup::AppsForFunction,
        Lookup::VariablesForFunction,
        Lookup::FunctionsForVariable,
    ];

    /// Kind of entity the query name refers to.
    pub fn input_kind(self) -> EntityKind {
        match self {
            Lookup::FunctionsForApp => EntityKind::Application,
            Lookup::AppsForFunction | Lookup::VariablesForFunction => EntityKind::Function,
            Lookup::FunctionsForVariable => EntityKind::Variable,
        }
    }

    pub fn relation(self) -> Relation {
        match self {
            Lookup::FunctionsForApp | Lookup::AppsForFunction => Relation::AppFunction,
            Lookup::VariablesForFunction | Lookup::FunctionsForVariable => {
                Relation::FunctionVariable
            }
        }
    }

    pub(crate) fn direction(self) -> Direction {
        match self {
            Lookup::FunctionsForApp | Lookup::VariablesForFunction => Direction::Outgoing,
            Lookup::AppsForFunction | Lookup::FunctionsForVariable => Direction::Incoming,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lookup::FunctionsForApp => "functions_for_app",
            Lookup::AppsForFunction => "apps_for_function",
            Lookup::VariablesForFunction => "variables_for_function",
            Lookup::FunctionsForVariable => "functions_for_variable",
        };
        f.write_str(s)
    }
}

/// Functions of an application mapped to their variables.
///
/// Keys keep the order in which the functions appear on the application's
/// edges; serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppStructure {
    entries: Vec<(String, Vec<String>)>,
}

impl AppStructure {
    pub fn get(&self, function: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == function)
            .map(|(_, vars)| vars.as_slice())
    }

    pub fn contains(&self, function: &str) -> bool {
        self.get(function).is_some()
    }

    /// Insert unless the function is already present. Returns whether it was added.
    pub(crate) fn insert_new(&mut self, function: String, variables: Vec<String>) -> bool {
        if self.contains(&function) {
            return false;
        }
        self.entries.push((function, variables));
        true
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, vars)| (name.as_str(), vars.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AppStructure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (function, variables) in &self.entries {
            map.serialize_entry(function, variables)?;
        }
        map.end()
    }
}

// ─── Response envelopes ────────────────────────────────────────────

/// A single-relation lookup with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub query: String,
    pub lookup: Lookup,
    pub found: bool,
    pub results: Vec<String>,
    /// Closest known name, only when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureResponse {
    pub query: String,
    pub found: bool,
    pub structure: AppStructure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: GraphStats,
}
