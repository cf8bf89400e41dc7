use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one logical HTTP call made by the transport.
///
/// `status` is `0` exactly when the call failed at transport level, in which
/// case `error` carries the failure description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub error: Option<String>,
}

impl ResponseResult {
    /// A response received from the remote, whatever its status.
    pub fn received(status: u16, headers: BTreeMap<String, String>, body: Value) -> Self {
        Self { status, headers, body, error: None }
    }

    /// A transport-level failure (connect, timeout, DNS, broken body).
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self { status: 0, headers: BTreeMap::new(), body: Value::Null, error: Some(error.into()) }
    }

    /// Whether the status is in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the call never produced an HTTP response.
    pub fn is_transport_failure(&self) -> bool {
        self.error.is_some()
    }
}
