//! Graph types — entity kinds, relations, names and edges.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize::NameKey;

/// The three kinds of entity in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Application,
    Function,
    Variable,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Application => "application",
            EntityKind::Function => "function",
            EntityKind::Variable => "variable",
        };
        write!(f, "{}", s)
    }
}

/// The two directed edge relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// application -> function
    AppFunction,
    /// function -> variable
    FunctionVariable,
}

impl Relation {
    /// Entity kinds on the (source, target) sides.
    pub fn sides(self) -> (EntityKind, EntityKind) {
        match self {
            Relation::AppFunction => (EntityKind::Application, EntityKind::Function),
            Relation::FunctionVariable => (EntityKind::Function, EntityKind::Variable),
        }
    }

    /// Section name in the source document.
    pub fn section(self) -> &'static str {
        match self {
            Relation::AppFunction => "app_function_edges",
            Relation::FunctionVariable => "function_variable_edges",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// An entity name as stored: the original display spelling plus its
/// normalized key, computed once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityName {
    pub display: String,
    #[serde(skip)]
    pub key: NameKey,
}

impl EntityName {
    pub fn new(display: impl Into<String>) -> Self {
        let display = display.into();
        let key = NameKey::new(&display);
        Self { display, key }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// One edge in canonical pair form, whatever shape it had in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgePair {
    pub source: EntityName,
    pub target: EntityName,
}

impl EdgePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: EntityName::new(source),
            target: EntityName::new(target),
        }
    }
}

/// Graph statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub application_count: usize,
    pub function_count: usize,
    pub variable_count: usize,
    pub app_function_edges: usize,
    pub function_variable_edges: usize,
    /// Entries dropped during load because they had no recognizable shape.
    pub skipped_entries: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applications, {} functions, {} variables, {} app-function edges, {} function-variable edges",
            self.application_count,
            self.function_count,
            self.variable_count,
            self.app_function_edges,
            self.function_variable_edges
        )?;
        if self.skipped_entries > 0 {
            write!(f, " ({} malformed entries skipped)", self.skipped_entries)?;
        }
        Ok(())
    }
}
