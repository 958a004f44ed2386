//! Graph module — loading and indexing the application/function/variable graph.
//!
//! ```text
//! source document ──► document::adapt ──► GraphStore ──► RelationGraph
//!   (JSON / YAML,        (one pass, all      (canonical     (petgraph, keyed by
//!    mixed shapes)        shapes resolved)    pairs)          normalized name)
//! ```

mod document;
pub mod engine;
pub mod normalize;
pub mod store;
pub mod types;

pub use engine::{EdgeData, NodeData, RelationGraph};
pub use normalize::{normalize_name, NameKey};
pub use store::{GraphStore, SourceFormat};
pub use types::{EdgePair, EntityKind, EntityName, GraphStats, Relation};
