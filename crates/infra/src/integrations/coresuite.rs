//! Coresuite ERP client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coresuite_core::{ErpClient, IntegrationLog, ProviderGate};
use coresuite_domain::{IntegrationError, OperationOutcome, ProviderConfig, Record, Result};
use reqwest::Method;

use super::transport::{ProviderProfile, ProviderTransport};
use crate::http::RequestBody;

const USER_AGENT: &str = "Coresuite-Express-Integrator/1.0";
const TIMEOUT: Duration = Duration::from_secs(20);
const RETRIES: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Pushes customers, products, sales and stock movements to Coresuite.
///
/// Unlike the other providers the ERP has no disabled mode: a missing base
/// URL is a configuration error.
pub struct CoresuiteClient {
    transport: ProviderTransport,
}

impl CoresuiteClient {
    /// Create the ERP client. Performs no I/O.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when the base URL is empty or the
    /// `customer_delete` override lacks `{id}`.
    pub fn new(config: &ProviderConfig, log: Arc<dyn IntegrationLog>) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(IntegrationError::Config(
                "Coresuite integration base URL is not configured".into(),
            ));
        }
        config.validate_id_templates("coresuite", &["customer_delete"])?;

        let profile = ProviderProfile {
            timeout: TIMEOUT,
            retries: Some(RETRIES),
            retry_delay: Some(RETRY_DELAY),
            success_message: "Coresuite request completed",
            failure_message: "Coresuite request failed",
        };

        let mut transport =
            ProviderTransport::new(config, profile, log)?.with_header("User-Agent", USER_AGENT);
        if let Some(tenant) = config.tenant() {
            transport = transport.with_header("X-Coresuite-Tenant", tenant);
        }
        if let Some(secret) = config.webhook_secret() {
            transport = transport.with_header("X-Integration-Secret", secret);
        }

        Ok(Self { transport })
    }
}

impl ProviderGate for CoresuiteClient {}

#[async_trait]
impl ErpClient for CoresuiteClient {
    async fn upsert_customer(&self, payload: &Record) -> Result<OperationOutcome> {
        let path = self.transport.path("customers", "/api/integrations/customers", None);
        Ok(self.transport.send_json(Method::PUT, &path, payload, "customer_upsert").await)
    }

    async fn delete_customer(&self, external_id: &str) -> Result<OperationOutcome> {
        let path = self.transport.path(
            "customer_delete",
            "/api/integrations/customers/{id}",
            Some(external_id),
        );
        Ok(self.transport.send(Method::DELETE, &path, RequestBody::Empty, "customer_delete").await)
    }

    async fn upsert_product(&self, payload: &Record) -> Result<OperationOutcome> {
        let path = self.transport.path("products", "/api/integrations/products", None);
        Ok(self.transport.send_json(Method::PUT, &path, payload, "product_upsert").await)
    }

    async fn push_sale(&self, payload: &Record) -> Result<OperationOutcome> {
        let path = self.transport.path("sales", "/api/integrations/sales", None);
        Ok(self.transport.send_json(Method::POST, &path, payload, "sale_push").await)
    }

    async fn push_inventory_adjustment(&self, payload: &Record) -> Result<OperationOutcome> {
        let path = self.transport.path("inventory", "/api/integrations/inventory", None);
        Ok(self.transport.send_json(Method::POST, &path, payload, "inventory_push").await)
    }
}
