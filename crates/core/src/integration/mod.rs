//! Outbound integration orchestration

pub mod payloads;
pub mod ports;
pub mod service;

pub use service::{Clock, IntegrationService};
