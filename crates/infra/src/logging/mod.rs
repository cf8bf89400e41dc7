//! Durable JSON-lines integration log.

mod integration_logger;

pub use integration_logger::IntegrationLogger;
