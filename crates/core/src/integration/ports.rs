//! Port interfaces for provider clients and the integration log

use async_trait::async_trait;
use coresuite_domain::{ErrorReport, OperationOutcome, Record, Result};
use serde_json::{Map, Value};

/// Enablement predicate shared by every provider port.
///
/// Providers without a disabled mode keep the default.
pub trait ProviderGate: Send + Sync {
    /// Whether calls will reach the remote provider.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// ERP (Coresuite) synchronization operations.
///
/// Operations return `Err` only for caller errors such as an unserializable
/// body; remote failures come back as unsuccessful outcomes.
#[async_trait]
pub trait ErpClient: ProviderGate {
    async fn upsert_customer(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn delete_customer(&self, external_id: &str) -> Result<OperationOutcome>;

    async fn upsert_product(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn push_sale(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn push_inventory_adjustment(&self, payload: &Record) -> Result<OperationOutcome>;
}

/// Payment gateway operations
#[async_trait]
pub trait PaymentGateway: ProviderGate {
    async fn create_payment_intent(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn capture_payment(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn refund(&self, payload: &Record) -> Result<OperationOutcome>;
}

/// Support ticketing operations
#[async_trait]
pub trait TicketingClient: ProviderGate {
    async fn create_ticket(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn update_ticket(&self, external_id: &str, payload: &Record)
        -> Result<OperationOutcome>;

    async fn add_comment(
        &self,
        external_id: &str,
        comment: &str,
        public: bool,
    ) -> Result<OperationOutcome>;
}

/// Digital signature operations
#[async_trait]
pub trait SignatureClient: ProviderGate {
    async fn send_signature_request(&self, payload: &Record) -> Result<OperationOutcome>;

    async fn cancel_signature_request(
        &self,
        external_id: &str,
        payload: &Record,
    ) -> Result<OperationOutcome>;

    async fn fetch_status(&self, external_id: &str) -> Result<OperationOutcome>;
}

/// Append-only structured log sink for integration events.
///
/// Implementations must never fail or panic; sink errors are swallowed.
pub trait IntegrationLog: Send + Sync {
    fn info(&self, message: &str, context: Map<String, Value>);

    fn error(&self, message: &str, context: Map<String, Value>);

    /// Log a caught error at ERROR level, merging the report into
    /// `context.exception`.
    fn exception(&self, report: &ErrorReport, context: Map<String, Value>);
}
