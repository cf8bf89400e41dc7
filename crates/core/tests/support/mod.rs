//! Shared test helpers for `coresuite-core` integration tests.
//!
//! In-memory mocks for every core port so orchestrator and key rotation tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod providers;
pub mod settings;

use coresuite_domain::Record;
use serde_json::Value;

/// Unwrap a `json!` object literal into a [`Record`].
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
