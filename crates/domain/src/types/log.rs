use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::IntegrationError;

/// Severity of an integration log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("INFO"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// One line of the integration log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: Map<String, Value>,
}

/// Description of an error caught by the orchestrator, as written into
/// `context.exception`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    pub code: String,
    pub file: String,
    pub line: u32,
}

impl ErrorReport {
    /// Capture `error` together with the caller's source location.
    #[track_caller]
    pub fn capture(error: &IntegrationError) -> Self {
        let location = Location::caller();
        Self {
            message: error.to_string(),
            code: error.code().to_string(),
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}
