//! Payment gateway client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coresuite_core::{IntegrationLog, PaymentGateway, ProviderGate};
use coresuite_domain::constants::PAYMENT_GATEWAY_DISABLED;
use coresuite_domain::{OperationOutcome, ProviderConfig, Record, Result};
use reqwest::Method;

use super::transport::{ProviderProfile, ProviderTransport};

const TIMEOUT: Duration = Duration::from_secs(20);

/// Payment intents, captures and refunds. Disabled until both base URL
/// and API key are set.
pub struct PaymentGatewayClient {
    transport: ProviderTransport,
}

impl PaymentGatewayClient {
    /// Create a payment gateway client. Performs no I/O.
    ///
    /// # Errors
    /// Returns `IntegrationError::Config` when the HTTP client cannot be
    /// built.
    pub fn new(config: &ProviderConfig, log: Arc<dyn IntegrationLog>) -> Result<Self> {
        let profile = ProviderProfile {
            timeout: TIMEOUT,
            retries: None,
            retry_delay: None,
            success_message: "Payment gateway call success",
            failure_message: "Payment gateway call failed",
        };
        Ok(Self { transport: ProviderTransport::new(config, profile, log)? })
    }

    async fn call(
        &self,
        operation_key: &str,
        default_path: &str,
        payload: &Record,
        operation: &'static str,
    ) -> OperationOutcome {
        if !self.is_enabled() {
            return OperationOutcome::disabled(PAYMENT_GATEWAY_DISABLED);
        }
        let path = self.transport.path(operation_key, default_path, None);
        self.transport.send_json(Method::POST, &path, payload, operation).await
    }
}

impl ProviderGate for PaymentGatewayClient {
    fn is_enabled(&self) -> bool {
        self.transport.config().is_configured()
    }
}

#[async_trait]
impl PaymentGateway for PaymentGatewayClient {
    async fn create_payment_intent(&self, payload: &Record) -> Result<OperationOutcome> {
        Ok(self.call("create_intent", "/v1/payment_intents", payload, "payment_intent_create").await)
    }

    async fn capture_payment(&self, payload: &Record) -> Result<OperationOutcome> {
        Ok(self.call("capture", "/v1/payments/capture", payload, "payment_capture").await)
    }

    async fn refund(&self, payload: &Record) -> Result<OperationOutcome> {
        Ok(self.call("refund", "/v1/refunds", payload, "payment_refund").await)
    }
}
