//! Configuration loading
//!
//! Reads the integration configuration from a JSON or TOML file and layers
//! environment overrides on top.

pub mod loader;

pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths};
