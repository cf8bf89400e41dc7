//! ERP API key rotation

use std::sync::Arc;

use coresuite_domain::constants::{API_KEY_BYTES, AUDIT_ACTION_KEY_ROTATED, CORESUITE_API_KEY_VAR};
use coresuite_domain::{AuditEntry, IntegrationError, KeyRotationOutcome, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{info, warn};

use super::ports::{AuditTrail, ConfigStore};

/// Rotates the Coresuite API key and records the rotation.
pub struct KeyRotationService {
    store: Arc<dyn ConfigStore>,
    audit: Arc<dyn AuditTrail>,
}

impl KeyRotationService {
    /// Rotation service writing keys to `store` and audit entries to `audit`.
    pub fn new(store: Arc<dyn ConfigStore>, audit: Arc<dyn AuditTrail>) -> Self {
        Self { store, audit }
    }

    /// Whether the configuration store accepts writes.
    pub fn can_update_config(&self) -> bool {
        self.store.is_writable()
    }

    /// Generate a new 32-byte key, persist it and audit the rotation.
    ///
    /// The audit write is best effort: once the key is persisted the rotation
    /// is reported as successful even if the audit insert fails.
    pub async fn generate_api_key(&self, user_id: i64) -> KeyRotationOutcome {
        if user_id <= 0 {
            return KeyRotationOutcome::failure(
                "Invalid user.",
                "Cannot record the operation without an authenticated user.",
            );
        }

        if !self.store.is_writable() {
            return KeyRotationOutcome::failure(
                "Configuration file is not writable.",
                "Update the .env file permissions to rotate the key.",
            );
        }

        let new_key = match generate_key() {
            Ok(key) => key,
            Err(err) => return KeyRotationOutcome::failure("Key generation failed.", err.to_string()),
        };

        if let Err(err) = self.store.set_values(&[(CORESUITE_API_KEY_VAR, &new_key)]) {
            warn!(user_id, error = %err, "key_rotation.persist_failed");
            return KeyRotationOutcome::failure(
                "Key update failed.",
                format!("Saving to .env failed: check permissions and retry ({err})."),
            );
        }

        self.record_audit(user_id, &new_key).await;
        info!(user_id, key = %mask_key(&new_key), "key_rotation.completed");

        KeyRotationOutcome::rotated(
            "New API key generated. Update business.coresuite.it with the new value.",
            new_key,
        )
    }

    async fn record_audit(&self, user_id: i64, new_key: &str) {
        let entry = AuditEntry {
            user_id,
            action: AUDIT_ACTION_KEY_ROTATED.to_string(),
            description: format!(
                "New business.coresuite.it API key generated ({})",
                mask_key(new_key)
            ),
        };

        if let Err(err) = self.audit.record(&entry).await {
            warn!(user_id, error = %err, "key_rotation.audit_failed");
        }
    }
}

/// First four and last four characters of `key`, joined by `...`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(4).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{head}...{tail}")
}

fn generate_key() -> Result<String> {
    let mut bytes = [0u8; API_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| IntegrationError::Security(format!("OS random generator failed: {e}")))?;
    Ok(hex::encode(bytes))
}
