//! Persistent settings storage

mod env_file;

pub use env_file::EnvFileStore;
