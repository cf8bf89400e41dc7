//! Mock provider clients and a recording integration log

use std::sync::Arc;

use async_trait::async_trait;
use coresuite_core::{
    ErpClient, IntegrationLog, PaymentGateway, ProviderGate, SignatureClient, TicketingClient,
};
use coresuite_domain::{
    ErrorReport, IntegrationError, LogLevel, OperationOutcome, Record, Result as DomainResult,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};

/// One call received by a mock provider: operation name plus its argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: &'static str,
    pub argument: Value,
}

/// Shared call journal used by every mock provider.
#[derive(Default, Clone)]
pub struct CallJournal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallJournal {
    pub fn push(&self, operation: &'static str, argument: Value) {
        self.calls.lock().push(Call { operation, argument });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }
}

fn ok_outcome() -> DomainResult<OperationOutcome> {
    Ok(OperationOutcome { success: true, status: 200, body: Value::Null, error: None })
}

/// ERP mock that records payloads and optionally fails every call.
#[derive(Default)]
pub struct MockErp {
    pub journal: CallJournal,
    failure: Option<IntegrationError>,
}

impl MockErp {
    pub fn failing(error: IntegrationError) -> Self {
        Self { journal: CallJournal::default(), failure: Some(error) }
    }

    fn respond(&self, operation: &'static str, argument: Value) -> DomainResult<OperationOutcome> {
        self.journal.push(operation, argument);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => ok_outcome(),
        }
    }
}

impl ProviderGate for MockErp {}

#[async_trait]
impl ErpClient for MockErp {
    async fn upsert_customer(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("upsert_customer", Value::Object(payload.clone()))
    }

    async fn delete_customer(&self, external_id: &str) -> DomainResult<OperationOutcome> {
        self.respond("delete_customer", Value::from(external_id))
    }

    async fn upsert_product(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("upsert_product", Value::Object(payload.clone()))
    }

    async fn push_sale(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("push_sale", Value::Object(payload.clone()))
    }

    async fn push_inventory_adjustment(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("push_inventory_adjustment", Value::Object(payload.clone()))
    }
}

/// Gated mock used for the payments, ticketing and signature ports.
pub struct MockGatedProvider {
    pub journal: CallJournal,
    enabled: bool,
}

impl MockGatedProvider {
    pub fn enabled() -> Self {
        Self { journal: CallJournal::default(), enabled: true }
    }

    pub fn disabled() -> Self {
        Self { journal: CallJournal::default(), enabled: false }
    }

    fn respond(&self, operation: &'static str, argument: Value) -> DomainResult<OperationOutcome> {
        self.journal.push(operation, argument);
        ok_outcome()
    }
}

impl ProviderGate for MockGatedProvider {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[async_trait]
impl PaymentGateway for MockGatedProvider {
    async fn create_payment_intent(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("create_payment_intent", Value::Object(payload.clone()))
    }

    async fn capture_payment(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("capture_payment", Value::Object(payload.clone()))
    }

    async fn refund(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("refund", Value::Object(payload.clone()))
    }
}

#[async_trait]
impl TicketingClient for MockGatedProvider {
    async fn create_ticket(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("create_ticket", Value::Object(payload.clone()))
    }

    async fn update_ticket(
        &self,
        external_id: &str,
        _payload: &Record,
    ) -> DomainResult<OperationOutcome> {
        self.respond("update_ticket", Value::from(external_id))
    }

    async fn add_comment(
        &self,
        external_id: &str,
        _comment: &str,
        _public: bool,
    ) -> DomainResult<OperationOutcome> {
        self.respond("add_comment", Value::from(external_id))
    }
}

#[async_trait]
impl SignatureClient for MockGatedProvider {
    async fn send_signature_request(&self, payload: &Record) -> DomainResult<OperationOutcome> {
        self.respond("send_signature_request", Value::Object(payload.clone()))
    }

    async fn cancel_signature_request(
        &self,
        external_id: &str,
        _payload: &Record,
    ) -> DomainResult<OperationOutcome> {
        self.respond("cancel_signature_request", Value::from(external_id))
    }

    async fn fetch_status(&self, external_id: &str) -> DomainResult<OperationOutcome> {
        self.respond("fetch_status", Value::from(external_id))
    }
}

/// A log line captured by [`RecordingLog`].
#[derive(Debug, Clone)]
pub struct Captured {
    pub level: LogLevel,
    pub message: String,
    pub context: Map<String, Value>,
}

/// Integration log that keeps every record in memory.
#[derive(Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<Captured>>,
}

impl RecordingLog {
    pub fn entries(&self) -> Vec<Captured> {
        self.entries.lock().clone()
    }

    fn push(&self, level: LogLevel, message: &str, context: Map<String, Value>) {
        self.entries.lock().push(Captured { level, message: message.to_string(), context });
    }
}

impl IntegrationLog for RecordingLog {
    fn info(&self, message: &str, context: Map<String, Value>) {
        self.push(LogLevel::Info, message, context);
    }

    fn error(&self, message: &str, context: Map<String, Value>) {
        self.push(LogLevel::Error, message, context);
    }

    fn exception(&self, report: &ErrorReport, mut context: Map<String, Value>) {
        context.insert(
            "exception".into(),
            serde_json::to_value(report).unwrap_or(Value::Null),
        );
        self.push(LogLevel::Error, &report.message, context);
    }
}
