//! Configuration management

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUDIT_DB, DEFAULT_ENV_FILE, DEFAULT_LOG_FILE, ID_PLACEHOLDER};
use crate::errors::{IntegrationError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub integrations: IntegrationsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Per-provider configuration sections. A missing section means the provider
/// is not configured at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    pub coresuite: Option<ProviderConfig>,
    pub payments: Option<ProviderConfig>,
    pub ticketing: Option<ProviderConfig>,
    pub digital_signature: Option<ProviderConfig>,
}

/// Connection settings for one external provider
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub webhook_secret: Option<String>,
    /// Operation name → path template overrides.
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("tenant", &self.tenant)
            .field("account_id", &self.account_id)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a config with just a base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), api_key: api_key.into(), ..Self::default() }
    }

    /// Whether both the base URL and the API key are present.
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Path template for `operation`, or `default` when not overridden.
    pub fn endpoint<'a>(&'a self, operation: &str, default: &'a str) -> &'a str {
        self.endpoints.get(operation).map_or(default, String::as_str)
    }

    /// Tenant id, if set to a non-blank value.
    pub fn tenant(&self) -> Option<&str> {
        non_blank(self.tenant.as_deref())
    }

    /// Account id, if set to a non-blank value.
    pub fn account_id(&self) -> Option<&str> {
        non_blank(self.account_id.as_deref())
    }

    /// Shared webhook secret, if set to a non-blank value.
    pub fn webhook_secret(&self) -> Option<&str> {
        non_blank(self.webhook_secret.as_deref())
    }

    /// Ensure every overridden template for the given per-entity operations
    /// carries the `{id}` placeholder.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` naming the first offending
    /// operation.
    pub fn validate_id_templates(&self, provider: &str, operations: &[&str]) -> Result<()> {
        for operation in operations {
            if let Some(template) = self.endpoints.get(*operation) {
                if !template.contains(ID_PLACEHOLDER) {
                    return Err(IntegrationError::Config(format!(
                        "{provider} endpoint override '{operation}' must contain {ID_PLACEHOLDER}: {template}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Local storage used by the integration layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON-lines integration log.
    pub log_file: PathBuf,
    /// `.env` file receiving rotated keys.
    pub env_file: PathBuf,
    /// SQLite database holding the audit trail.
    pub audit_db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            audit_db_path: PathBuf::from(DEFAULT_AUDIT_DB),
        }
    }
}
