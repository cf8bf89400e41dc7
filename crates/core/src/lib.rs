//! # Coresuite Core
//!
//! Integration business logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for provider clients, the integration log,
//!   the configuration store and the audit trail
//! - Payload builders mapping domain records to provider payloads
//! - The integration orchestrator and the API key rotation service
//!
//! ## Architecture Principles
//! - Only depends on `coresuite-domain`
//! - No HTTP, file or database code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod integration;
pub mod settings;

// Re-export specific items to avoid ambiguity
pub use integration::ports::{
    ErpClient, IntegrationLog, PaymentGateway, ProviderGate, SignatureClient, TicketingClient,
};
pub use integration::IntegrationService;
pub use settings::ports::{AuditTrail, ConfigStore};
pub use settings::KeyRotationService;
