//! Digital signature client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coresuite_core::{IntegrationLog, ProviderGate, SignatureClient};
use coresuite_domain::constants::DIGITAL_SIGNATURE_DISABLED;
use coresuite_domain::{OperationOutcome, ProviderConfig, Record, Result};
use reqwest::Method;

use super::transport::{ProviderProfile, ProviderTransport};
use crate::http::RequestBody;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Signature requests for contracts and their status.
pub struct DigitalSignatureClient {
    transport: ProviderTransport,
}

impl DigitalSignatureClient {
    /// Create a digital signature client. Performs no I/O.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when the `cancel` or `status`
    /// override lacks `{id}`.
    pub fn new(config: &ProviderConfig, log: Arc<dyn IntegrationLog>) -> Result<Self> {
        config.validate_id_templates("digital_signature", &["cancel", "status"])?;

        let profile = ProviderProfile {
            timeout: TIMEOUT,
            retries: None,
            retry_delay: None,
            success_message: "Digital signature call success",
            failure_message: "Digital signature call failed",
        };
        Ok(Self { transport: ProviderTransport::new(config, profile, log)? })
    }
}

impl ProviderGate for DigitalSignatureClient {
    fn is_enabled(&self) -> bool {
        self.transport.config().is_configured()
    }
}

#[async_trait]
impl SignatureClient for DigitalSignatureClient {
    async fn send_signature_request(&self, payload: &Record) -> Result<OperationOutcome> {
        if !self.is_enabled() {
            return Ok(OperationOutcome::disabled(DIGITAL_SIGNATURE_DISABLED));
        }
        let path = self.transport.path("send_request", "/api/v1/signature_requests", None);
        Ok(self.transport.send_json(Method::POST, &path, payload, "signature_request").await)
    }

    async fn cancel_signature_request(
        &self,
        external_id: &str,
        payload: &Record,
    ) -> Result<OperationOutcome> {
        if !self.is_enabled() {
            return Ok(OperationOutcome::disabled(DIGITAL_SIGNATURE_DISABLED));
        }
        let path = self.transport.path(
            "cancel",
            "/api/v1/signature_requests/{id}/cancel",
            Some(external_id),
        );
        Ok(self.transport.send_json(Method::POST, &path, payload, "signature_cancel").await)
    }

    async fn fetch_status(&self, external_id: &str) -> Result<OperationOutcome> {
        if !self.is_enabled() {
            return Ok(OperationOutcome::disabled(DIGITAL_SIGNATURE_DISABLED));
        }
        let path =
            self.transport.path("status", "/api/v1/signature_requests/{id}", Some(external_id));
        Ok(self.transport.send(Method::GET, &path, RequestBody::Empty, "signature_status").await)
    }
}
