//! Mock configuration store and audit trail

use async_trait::async_trait;
use coresuite_core::{AuditTrail, ConfigStore};
use coresuite_domain::{AuditEntry, IntegrationError, Result as DomainResult};
use parking_lot::Mutex;

/// In-memory `.env` stand-in.
pub struct MockConfigStore {
    writable: bool,
    fail_writes: bool,
    values: Mutex<Vec<(String, String)>>,
}

impl MockConfigStore {
    pub fn writable() -> Self {
        Self { writable: true, fail_writes: false, values: Mutex::new(Vec::new()) }
    }

    pub fn read_only() -> Self {
        Self { writable: false, fail_writes: false, values: Mutex::new(Vec::new()) }
    }

    /// Reports itself writable but rejects every write.
    pub fn broken() -> Self {
        Self { writable: true, fail_writes: true, values: Mutex::new(Vec::new()) }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }
}

impl ConfigStore for MockConfigStore {
    fn is_writable(&self) -> bool {
        self.writable
    }

    fn set_values(&self, values: &[(&str, &str)]) -> DomainResult<()> {
        if self.fail_writes {
            return Err(IntegrationError::Storage("disk full".into()));
        }
        let mut stored = self.values.lock();
        for (key, value) in values {
            stored.push(((*key).to_string(), (*value).to_string()));
        }
        Ok(())
    }
}

/// Audit trail keeping entries in memory, optionally failing every insert.
#[derive(Default)]
pub struct MockAuditTrail {
    fail: bool,
    entries: Mutex<Vec<AuditEntry>>,
}

impl MockAuditTrail {
    pub fn failing() -> Self {
        Self { fail: true, entries: Mutex::new(Vec::new()) }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl AuditTrail for MockAuditTrail {
    async fn record(&self, entry: &AuditEntry) -> DomainResult<()> {
        if self.fail {
            return Err(IntegrationError::Database("audit_log table missing".into()));
        }
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}
