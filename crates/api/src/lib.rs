//! # Coresuite App
//!
//! Composition root and command-line entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - The `status` and `rotate-key` commands
//! - Tracing bootstrap
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires concrete infrastructure into the core services

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::{rotate_key, status, StatusReport};
pub use context::AppContext;
