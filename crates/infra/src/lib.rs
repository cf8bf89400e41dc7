//! # Coresuite Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retry-capable HTTP transport
//! - The JSON-lines integration logger
//! - Provider clients (Coresuite ERP, payments, ticketing, digital signature)
//! - Configuration loading, the `.env` writer and the SQLite audit trail
//!
//! ## Architecture
//! - Implements traits defined in `coresuite-core`
//! - Contains all "impure" code (network, filesystem, database)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod logging;
pub mod settings;

// Re-export commonly used items
pub use database::SqliteAuditRepository;
pub use errors::InfraError;
pub use http::{HttpClient, RequestBody, RequestOptions};
pub use integrations::{
    CoresuiteClient, DigitalSignatureClient, HelpdeskClient, PaymentGatewayClient,
    ProviderRegistry,
};
pub use logging::IntegrationLogger;
pub use settings::EnvFileStore;
