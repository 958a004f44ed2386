//! Query module — the lookups callers run against a loaded graph.
//!
//! ## Core API
//!
//! ```ignore
//! engine.functions_for_app("Billing")        // ["Charge", ...]
//! engine.apps_for_function("charge")         // ["Billing", ...]
//! engine.variables_for_function("Charge")    // ["amount", ...]
//! engine.functions_for_variable("Amount")    // ["Charge", ...]
//! engine.app_structure("billing")            // {"Charge": ["amount"], ...}
//! ```

pub mod engine;
pub mod suggest;
pub mod types;

pub use engine::{QueryEngine, QueryOptions};
pub use types::{AppStructure, Lookup, LookupResponse, StatsResponse, StructureResponse};
