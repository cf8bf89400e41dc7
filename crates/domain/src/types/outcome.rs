use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::ResponseResult;

/// Normalized result of one provider operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub status: u16,
    pub body: Value,
    pub error: Option<String>,
}

impl OperationOutcome {
    /// Sentinel returned without any I/O by a provider that is not enabled.
    pub fn disabled(code: &str) -> Self {
        Self { success: false, status: 0, body: Value::Null, error: Some(code.to_string()) }
    }

    /// Whether this outcome is the disabled sentinel for `code`.
    pub fn is_disabled(&self, code: &str) -> bool {
        self.status == 0 && self.error.as_deref() == Some(code)
    }
}

impl From<ResponseResult> for OperationOutcome {
    fn from(response: ResponseResult) -> Self {
        Self {
            success: response.is_success(),
            status: response.status,
            body: response.body,
            error: response.error,
        }
    }
}
