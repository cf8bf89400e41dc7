//! Error types used throughout the integration layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the integration layer
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum IntegrationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntegrationError {
    /// Stable label for the error kind, used as the `code` of exception
    /// log records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Serialization(_) => "serialization",
            Self::InvalidInput(_) => "invalid_input",
            Self::Storage(_) => "storage",
            Self::Database(_) => "database",
            Self::Security(_) => "security",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for IntegrationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

/// Result type alias for integration operations
pub type Result<T> = std::result::Result<T, IntegrationError>;
