//! Builds provider clients from configuration

use std::sync::Arc;

use coresuite_core::{
    ErpClient, IntegrationLog, IntegrationService, PaymentGateway, SignatureClient,
    TicketingClient,
};
use coresuite_domain::{IntegrationsConfig, ProviderConfig, Result};
use tracing::{debug, info};

use super::{CoresuiteClient, DigitalSignatureClient, HelpdeskClient, PaymentGatewayClient};

/// The provider clients that are configured, each behind its port.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    pub erp: Option<Arc<dyn ErpClient>>,
    pub payments: Option<Arc<dyn PaymentGateway>>,
    pub ticketing: Option<Arc<dyn TicketingClient>>,
    pub signature: Option<Arc<dyn SignatureClient>>,
}

impl ProviderRegistry {
    /// Instantiate a client for every section with both a base URL and an
    /// API key. Performs no network I/O.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when a configured section is
    /// invalid (for example an `{id}` override without the placeholder).
    pub fn from_config(config: &IntegrationsConfig, log: &Arc<dyn IntegrationLog>) -> Result<Self> {
        let mut registry = Self::default();

        if let Some(section) = configured(config.coresuite.as_ref(), "coresuite") {
            registry.erp = Some(Arc::new(CoresuiteClient::new(section, Arc::clone(log))?));
        }
        if let Some(section) = configured(config.payments.as_ref(), "payments") {
            registry.payments = Some(Arc::new(PaymentGatewayClient::new(section, Arc::clone(log))?));
        }
        if let Some(section) = configured(config.ticketing.as_ref(), "ticketing") {
            registry.ticketing = Some(Arc::new(HelpdeskClient::new(section, Arc::clone(log))?));
        }
        if let Some(section) = configured(config.digital_signature.as_ref(), "digital_signature") {
            registry.signature =
                Some(Arc::new(DigitalSignatureClient::new(section, Arc::clone(log))?));
        }

        Ok(registry)
    }

    /// Hand every configured client to `service`.
    pub fn attach(self, mut service: IntegrationService) -> IntegrationService {
        if let Some(erp) = self.erp {
            service = service.with_erp(erp);
        }
        if let Some(payments) = self.payments {
            service = service.with_payments(payments);
        }
        if let Some(ticketing) = self.ticketing {
            service = service.with_ticketing(ticketing);
        }
        if let Some(signature) = self.signature {
            service = service.with_signature(signature);
        }
        service
    }
}

fn configured<'a>(section: Option<&'a ProviderConfig>, name: &str) -> Option<&'a ProviderConfig> {
    match section {
        Some(section) if section.is_configured() => {
            info!(provider = name, "integration provider configured");
            Some(section)
        }
        Some(_) => {
            debug!(provider = name, "integration provider missing base URL or API key, skipped");
            None
        }
        None => None,
    }
}
