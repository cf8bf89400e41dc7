//! Integration orchestrator - core business logic
//!
//! Turns domain events into provider calls. Every public method is
//! fire-and-forget: an absent or disabled provider makes it a no-op, and any
//! error raised while building the payload or calling the provider is logged
//! through [`IntegrationLog::exception`] and swallowed, so the domain
//! transaction that triggered the sync is never affected.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use coresuite_domain::{ErrorReport, OperationOutcome, Record, Result};
use serde_json::{Map, Value};
use tracing::debug;

use super::payloads;
use super::ports::{
    ErpClient, IntegrationLog, PaymentGateway, ProviderGate, SignatureClient, TicketingClient,
};

/// Source of the `synced_at` timestamps stamped on payloads.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Integration orchestrator
pub struct IntegrationService {
    erp: Option<Arc<dyn ErpClient>>,
    payments: Option<Arc<dyn PaymentGateway>>,
    ticketing: Option<Arc<dyn TicketingClient>>,
    signature: Option<Arc<dyn SignatureClient>>,
    logger: Arc<dyn IntegrationLog>,
    clock: Clock,
}

impl IntegrationService {
    /// Create an orchestrator with no provider configured.
    pub fn new(logger: Arc<dyn IntegrationLog>) -> Self {
        Self {
            erp: None,
            payments: None,
            ticketing: None,
            signature: None,
            logger,
            clock: Arc::new(Utc::now),
        }
    }

    /// Attach the Coresuite ERP client.
    pub fn with_erp(mut self, client: Arc<dyn ErpClient>) -> Self {
        self.erp = Some(client);
        self
    }

    /// Attach the payment gateway.
    pub fn with_payments(mut self, client: Arc<dyn PaymentGateway>) -> Self {
        self.payments = Some(client);
        self
    }

    /// Attach the helpdesk client.
    pub fn with_ticketing(mut self, client: Arc<dyn TicketingClient>) -> Self {
        self.ticketing = Some(client);
        self
    }

    /// Attach the digital signature client.
    pub fn with_signature(mut self, client: Arc<dyn SignatureClient>) -> Self {
        self.signature = Some(client);
        self
    }

    /// Replace the wall clock, mostly for deterministic tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Names of the providers that will actually receive calls.
    pub fn enabled_providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if active(&self.erp).is_some() {
            names.push("coresuite");
        }
        if active(&self.payments).is_some() {
            names.push("payments");
        }
        if active(&self.ticketing).is_some() {
            names.push("ticketing");
        }
        if active(&self.signature).is_some() {
            names.push("digital_signature");
        }
        names
    }

    /// Upsert `customer` in the ERP.
    pub async fn sync_customer(&self, customer: &Record) {
        let Some(erp) = active(&self.erp) else { return };
        let synced_at = self.timestamp();
        self.guarded("customer_sync", async {
            let payload = payloads::customer_payload(customer, &synced_at)?;
            erp.upsert_customer(&payload).await
        })
        .await;
    }

    /// Delete the ERP copy of customer `customer_id`.
    pub async fn remove_customer(&self, customer_id: i64) {
        let Some(erp) = active(&self.erp) else { return };
        let external_id = payloads::external_id("customer", customer_id);
        self.guarded("customer_delete", erp.delete_customer(&external_id)).await;
    }

    /// Upsert `product` in the ERP.
    pub async fn sync_product(&self, product: &Record) {
        let Some(erp) = active(&self.erp) else { return };
        let synced_at = self.timestamp();
        self.guarded("product_sync", async {
            let payload = payloads::product_payload(product, &synced_at)?;
            erp.upsert_product(&payload).await
        })
        .await;
    }

    /// Push `sale` and its line `items` to the ERP.
    pub async fn sync_sale(&self, sale: &Record, items: &[Record]) {
        let Some(erp) = active(&self.erp) else { return };
        let synced_at = self.timestamp();
        self.guarded("sale_sync", async {
            let payload = payloads::sale_payload(sale, items, &synced_at)?;
            erp.push_sale(&payload).await
        })
        .await;
    }

    /// Inventory movements are forwarded as-is.
    pub async fn sync_inventory_movement(&self, movement: &Record) {
        let Some(erp) = active(&self.erp) else { return };
        self.guarded("inventory_sync", erp.push_inventory_adjustment(movement)).await;
    }

    /// Capture `payment` through the payment gateway.
    pub async fn forward_payment(&self, payment: &Record) {
        let Some(gateway) = active(&self.payments) else { return };
        self.guarded("payment_forward", gateway.capture_payment(payment)).await;
    }

    /// Open a payment intent for `payment`.
    pub async fn create_payment_intent(&self, payment: &Record) {
        let Some(gateway) = active(&self.payments) else { return };
        self.guarded("payment_intent", gateway.create_payment_intent(payment)).await;
    }

    /// Open a helpdesk ticket from `ticket`.
    pub async fn push_support_ticket(&self, ticket: &Record) {
        let Some(ticketing) = active(&self.ticketing) else { return };
        self.guarded("ticket_push", ticketing.create_ticket(ticket)).await;
    }

    /// Ask the signature provider to sign `document`.
    pub async fn request_signature(&self, document: &Record) {
        let Some(signature) = active(&self.signature) else { return };
        self.guarded("signature_request", signature.send_signature_request(document)).await;
    }

    /// Await `call` and log its error, if any. Unsuccessful outcomes were
    /// already logged by the provider client.
    async fn guarded<F>(&self, operation: &'static str, call: F)
    where
        F: Future<Output = Result<OperationOutcome>>,
    {
        match call.await {
            Ok(outcome) => {
                debug!(operation, status = outcome.status, success = outcome.success, "integration call finished");
            }
            Err(err) => {
                let report = ErrorReport::capture(&err);
                let mut context = Map::new();
                context.insert("operation".into(), Value::from(operation));
                self.logger.exception(&report, context);
            }
        }
    }

    fn timestamp(&self) -> String {
        (self.clock)().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn active<T: ProviderGate + ?Sized>(slot: &Option<Arc<T>>) -> Option<&Arc<T>> {
    slot.as_ref().filter(|client| client.is_enabled())
}
