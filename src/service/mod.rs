//! Service module — answers requests from external callers.
//!
//! A caller (HTTP front end, editor plugin, shell pipe) writes one JSON
//! request per line and reads one JSON response per line:
//!
//! ```text
//! → {"command": "functions_for_app", "name": "Billing"}
//! ← {"status": "ok", "data": {"query": "Billing", "lookup": "functions_for_app", "found": true, "results": ["Charge"]}}
//! ```
//!
//! The engine is read-only, so any number of callers can share one.

pub mod protocol;

pub use protocol::{Request, Response};

use std::io::{BufRead, Write};
use tracing::{debug, warn};

use crate::error::Result;
use crate::query::{Lookup, QueryEngine};

/// Process a request and return a response.
pub fn process_request(engine: &QueryEngine, request: Request) -> Response {
    match request {
        Request::FunctionsForApp { name } => {
            Response::ok(engine.lookup(Lookup::FunctionsForApp, &name))
        }
        Request::AppsForFunction { name } => {
            Response::ok(engine.lookup(Lookup::AppsForFunction, &name))
        }
        Request::VariablesForFunction { name } => {
            Response::ok(engine.lookup(Lookup::VariablesForFunction, &name))
        }
        Request::FunctionsForVariable { name } => {
            Response::ok(engine.lookup(Lookup::FunctionsForVariable, &name))
        }
        Request::AppStructure { name } => Response::ok(engine.structure(&name)),
        Request::ListApps => Response::ok(engine.applications()),
        Request::Stats => Response::ok(engine.stats_response()),
        Request::Ping => Response::Pong,
    }
}

/// Decode one request line and process it. Undecodable lines get an
/// `error` response.
pub fn handle_line(engine: &QueryEngine, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(?request, "received request");
            process_request(engine, request)
        }
        Err(e) => {
            warn!(error = %e, "bad request");
            Response::error(format!("invalid request: {}", e))
        }
    }
}

/// Serve requests until the reader is exhausted. Blank lines are ignored.
///
/// Returns the number of requests answered.
pub fn serve<R: BufRead, W: Write>(
    engine: &QueryEngine,
    reader: R,
    mut writer: W,
) -> Result<usize> {
    let mut handled = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(engine, &line);
        let response_json = serde_json::to_string(&response)?;
        writeln!(writer, "{}", response_json)?;
        writer.flush()?;
        handled += 1;
    }

    debug!(handled, "input closed");
    Ok(handled)
}
