//! # Coresuite Domain
//!
//! Value types shared by every layer of the integration workspace.
//!
//! This crate contains:
//! - The integration error type and `Result` alias
//! - Provider and storage configuration structures
//! - Transport/outcome value types, log records and audit entries
//! - Integration constants (default endpoints, timeouts, sentinel codes)
//!
//! ## Architecture
//! - No dependencies on other Coresuite crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
