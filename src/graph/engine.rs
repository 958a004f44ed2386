//! Relation graph — petgraph index over a loaded [`GraphStore`].
//!
//! One node per (entity kind, normalized name), so every spelling of a name
//! lands on the same node. Edges keep the display names exactly as they
//! appeared in the source pair; lookups return those, in source order.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use super::normalize::NameKey;
use super::store::GraphStore;
use super::types::{EdgePair, EntityKind, EntityName, Relation};

/// A node: one logical entity.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: EntityKind,
    pub key: NameKey,
    /// First spelling seen for this entity (declared lists win over edges).
    pub name: String,
}

/// An edge: one source pair, duplicates included.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub relation: Relation,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Default)]
pub struct RelationGraph {
    graph: DiGraph<NodeData, EdgeData>,
    index: HashMap<EntityKind, HashMap<NameKey, NodeIndex>>,
}

impl RelationGraph {
    /// Index a store. Dangling edge endpoints simply become nodes.
    pub fn build(store: &GraphStore) -> Self {
        let mut graph = Self::default();

        for name in store.applications() {
            graph.ensure_node(EntityKind::Application, name);
        }
        for name in store.functions() {
            graph.ensure_node(EntityKind::Function, name);
        }
        for name in store.variables() {
            graph.ensure_node(EntityKind::Variable, name);
        }

        // Edge indices grow in insertion order, which is what lookups sort by.
        for pair in store.app_function_edges() {
            graph.add_pair(Relation::AppFunction, pair);
        }
        for pair in store.function_variable_edges() {
            graph.add_pair(Relation::FunctionVariable, pair);
        }

        graph
    }

    fn ensure_node(&mut self, kind: EntityKind, name: &EntityName) -> NodeIndex {
        if let Some(&idx) = self.index.get(&kind).and_then(|m| m.get(&name.key)) {
            return idx;
        }
        let idx = self.graph.add_node(NodeData {
            kind,
            key: name.key.clone(),
            name: name.display.clone(),
        });
        self.index
            .entry(kind)
            .or_default()
            .insert(name.key.clone(), idx);
        idx
    }

    fn add_pair(&mut self, relation: Relation, pair: &EdgePair) {
        let (source_kind, target_kind) = relation.sides();
        let src = self.ensure_node(source_kind, &pair.source);
        let tgt = self.ensure_node(target_kind, &pair.target);
        self.graph.add_edge(
            src,
            tgt,
            EdgeData {
                relation,
                source: pair.source.display.clone(),
                target: pair.target.display.clone(),
            },
        );
    }

    /// Find the node for an entity.
    pub fn find(&self, kind: EntityKind, key: &NameKey) -> Option<NodeIndex> {
        self.index.get(&kind).and_then(|m| m.get(key)).copied()
    }

    /// Display names across `relation` from the entity `(kind, key)`.
    ///
    /// `Outgoing` walks source -> target, `Incoming` target -> source.
    /// Results follow source edge order and keep duplicates.
    pub fn related(
        &self,
        kind: EntityKind,
        key: &NameKey,
        relation: Relation,
        direction: Direction,
    ) -> Vec<&str> {
        let Some(node) = self.find(kind, key) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, direction)
            .filter(|e| e.weight().relation == relation)
            .collect();
        edges.sort_by_key(|e| e.id());

        edges
            .into_iter()
            .map(|e| match direction {
                Direction::Outgoing => e.weight().target.as_str(),
                Direction::Incoming => e.weight().source.as_str(),
            })
            .collect()
    }

    /// All entities of one kind, in the order they were first seen.
    pub fn entities(&self, kind: EntityKind) -> impl Iterator<Item = &NodeData> {
        self.graph.node_weights().filter(move |n| n.kind == kind)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
