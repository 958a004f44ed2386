//! # appgraph
//!
//! Lookups over an application → function → variable usage graph.
//!
//! The graph is loaded once from a JSON or YAML document and never changes
//! afterwards. Names are matched after normalization, so `"Order Service"`,
//! `"order-service"`, `"OrderService"` and `"  ORDER_SERVICE  "` all refer to
//! the same entity.
//!
//! ## Key Features
//!
//! - **Shape-tolerant loading**: edges as name pairs, as `side_a`/`side_b`
//!   records, or nested under their application/function, mixed freely
//! - **One matching rule**: normalize once at load, once per query
//! - **Never fails on lookup**: unknown names give empty results
//! - **Suggestions**: nearest known name when a lookup matches nothing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use appgraph::QueryEngine;
//! use std::path::Path;
//!
//! let engine = QueryEngine::load(Path::new("graph_data.json"))?;
//!
//! let functions = engine.functions_for_app("billing");
//! let structure = engine.app_structure("Billing");
//! # Ok::<(), appgraph::AppGraphError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod query;
pub mod service;

// Re-exports for convenience
pub use error::{AppGraphError, Result};

pub use config::Config;
pub use graph::{
    normalize_name, EdgePair, EntityKind, EntityName, GraphStats, GraphStore, NameKey, Relation,
    SourceFormat,
};
pub use query::{
    AppStructure, Lookup, LookupResponse, QueryEngine, QueryOptions, StatsResponse,
    StructureResponse,
};
