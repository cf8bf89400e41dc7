use serde::{Deserialize, Serialize};

/// One row of the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub user_id: i64,
    pub action: String,
    pub description: String,
}

/// User-facing result of an API key rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRotationOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl KeyRotationOutcome {
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), error: Some(error.into()), api_key: None }
    }

    pub fn rotated(message: impl Into<String>, api_key: String) -> Self {
        Self { success: true, message: message.into(), error: None, api_key: Some(api_key) }
    }
}
