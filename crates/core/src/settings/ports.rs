//! Port interfaces for the settings service

use async_trait::async_trait;
use coresuite_domain::{AuditEntry, Result};

/// Process configuration store (an `.env` file in production).
pub trait ConfigStore: Send + Sync {
    /// Whether `set_values` can be expected to succeed.
    fn is_writable(&self) -> bool;

    /// Upsert `KEY=value` entries, leaving every other entry untouched.
    fn set_values(&self, values: &[(&str, &str)]) -> Result<()>;
}

/// Durable audit trail
#[async_trait]
pub trait AuditTrail: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<()>;
}
