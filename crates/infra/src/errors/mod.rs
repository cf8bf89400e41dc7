//! Error conversion helpers for the infrastructure layer.

mod conversions;

pub use conversions::InfraError;
