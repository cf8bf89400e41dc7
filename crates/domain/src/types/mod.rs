//! Domain value types
//!
//! Transient per-call values (responses, outcomes), append-only records
//! (log lines, audit entries) and the loosely-typed inbound record shape.

pub mod audit;
pub mod log;
pub mod outcome;
pub mod response;

pub use audit::{AuditEntry, KeyRotationOutcome};
pub use log::{ErrorReport, LogLevel, LogRecord};
pub use outcome::OperationOutcome;
pub use response::ResponseResult;

/// Inbound domain data (customer, product, sale, ...) as handed over by the
/// application: a plain JSON object.
pub type Record = serde_json::Map<String, serde_json::Value>;
