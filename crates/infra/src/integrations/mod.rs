//! Outbound provider clients
//!
//! Each client implements one `coresuite-core` port on top of the shared
//! [`HttpClient`](crate::http::HttpClient) and logs one INFO or ERROR record
//! per operation.

mod coresuite;
mod payments;
pub mod registry;
mod signature;
mod ticketing;
mod transport;

pub use coresuite::CoresuiteClient;
pub use payments::PaymentGatewayClient;
pub use registry::ProviderRegistry;
pub use signature::DigitalSignatureClient;
pub use ticketing::HelpdeskClient;
