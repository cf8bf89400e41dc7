//! Support ticketing client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coresuite_core::{IntegrationLog, ProviderGate, TicketingClient};
use coresuite_domain::constants::TICKETING_DISABLED;
use coresuite_domain::{OperationOutcome, ProviderConfig, Record, Result};
use reqwest::Method;
use serde_json::Value;

use super::transport::{ProviderProfile, ProviderTransport};

const TIMEOUT: Duration = Duration::from_secs(20);

/// Helpdesk tickets and comments, scoped by `X-Account-Id` when set.
pub struct HelpdeskClient {
    transport: ProviderTransport,
}

impl HelpdeskClient {
    /// Create a ticketing client. Performs no I/O.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when the `update` or `comment`
    /// override lacks `{id}`.
    pub fn new(config: &ProviderConfig, log: Arc<dyn IntegrationLog>) -> Result<Self> {
        config.validate_id_templates("ticketing", &["update", "comment"])?;

        let profile = ProviderProfile {
            timeout: TIMEOUT,
            retries: None,
            retry_delay: None,
            success_message: "Ticketing call success",
            failure_message: "Ticketing call failed",
        };
        let mut transport = ProviderTransport::new(config, profile, log)?;
        if let Some(account_id) = config.account_id() {
            transport = transport.with_header("X-Account-Id", account_id);
        }

        Ok(Self { transport })
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        payload: &Record,
        operation: &'static str,
    ) -> OperationOutcome {
        if !self.is_enabled() {
            return OperationOutcome::disabled(TICKETING_DISABLED);
        }
        self.transport.send_json(method, path, payload, operation).await
    }
}

impl ProviderGate for HelpdeskClient {
    fn is_enabled(&self) -> bool {
        self.transport.config().is_configured()
    }
}

#[async_trait]
impl TicketingClient for HelpdeskClient {
    async fn create_ticket(&self, payload: &Record) -> Result<OperationOutcome> {
        let path = self.transport.path("create", "/api/v1/tickets", None);
        Ok(self.call(Method::POST, &path, payload, "ticket_create").await)
    }

    async fn update_ticket(&self, external_id: &str, payload: &Record) -> Result<OperationOutcome> {
        let path = self.transport.path("update", "/api/v1/tickets/{id}", Some(external_id));
        Ok(self.call(Method::PUT, &path, payload, "ticket_update").await)
    }

    async fn add_comment(
        &self,
        external_id: &str,
        comment: &str,
        public: bool,
    ) -> Result<OperationOutcome> {
        let path =
            self.transport.path("comment", "/api/v1/tickets/{id}/comments", Some(external_id));
        let mut payload = Record::new();
        payload.insert("comment".into(), Value::from(comment));
        payload.insert("is_public".into(), Value::from(public));
        Ok(self.call(Method::POST, &path, &payload, "ticket_comment").await)
    }
}
