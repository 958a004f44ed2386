//! Service protocol — request/response types for line-delimited JSON callers.

use serde::{Deserialize, Serialize};

/// Request from a caller. One per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Functions of an application
    FunctionsForApp { name: String },

    /// Applications using a function
    AppsForFunction { name: String },

    /// Variables of a function
    VariablesForFunction { name: String },

    /// Functions of an application mapped to their variables
    AppStructure { name: String },

    /// Functions using a variable
    FunctionsForVariable { name: String },

    /// Declared applications
    ListApps,

    /// Graph statistics
    Stats,

    /// Check the service is alive
    Ping,
}

/// Response to a caller. One per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// Successful response with JSON data
    Ok { data: serde_json::Value },

    /// The request could not be understood
    Error { message: String },

    /// Reply to `ping`
    Pong,
}

impl Response {
    pub fn ok<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Response::Ok { data },
            Err(e) => Response::error(format!("cannot encode response: {}", e)),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Response::Error {
            message: msg.into(),
        }
    }
}
