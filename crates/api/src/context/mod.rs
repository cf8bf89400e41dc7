//! Application context - dependency injection container

use std::sync::Arc;

use coresuite_core::{IntegrationLog, IntegrationService, KeyRotationService};
use coresuite_domain::{Config, Result};
use coresuite_infra::{
    config, EnvFileStore, IntegrationLogger, ProviderRegistry, SqliteAuditRepository,
};

/// Application context - holds all services and dependencies
pub struct AppContext {
    /// Configuration the context was built from.
    pub config: Config,
    pub logger: Arc<IntegrationLogger>,
    /// Orchestrator with every configured provider attached.
    pub integrations: Arc<IntegrationService>,
    pub key_rotation: Arc<KeyRotationService>,
}

impl AppContext {
    /// Load configuration from the standard locations and the environment,
    /// then build the context.
    ///
    /// # Errors
    /// See [`AppContext::new`] and [`config::load`].
    pub fn load() -> Result<Self> {
        Self::new(config::load()?)
    }

    /// Build every service from `config`. Performs no network I/O.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` for invalid provider sections and
    /// `IntegrationError::Database` when the audit database cannot be opened.
    pub fn new(config: Config) -> Result<Self> {
        let logger = Arc::new(IntegrationLogger::new(&config.storage.log_file));
        let log: Arc<dyn IntegrationLog> = logger.clone();

        let registry = ProviderRegistry::from_config(&config.integrations, &log)?;
        let integrations = Arc::new(registry.attach(IntegrationService::new(Arc::clone(&log))));
        tracing::info!(
            providers = ?integrations.enabled_providers(),
            "integration service initialised"
        );

        let env_store = Arc::new(EnvFileStore::new(&config.storage.env_file));
        let audit = Arc::new(SqliteAuditRepository::open(&config.storage.audit_db_path)?);
        let key_rotation = Arc::new(KeyRotationService::new(env_store, audit));

        Ok(Self { config, logger, integrations, key_rotation })
    }
}
