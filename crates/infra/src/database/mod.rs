//! Database implementations

mod audit_repository;
mod pool;

pub use audit_repository::SqliteAuditRepository;
pub use pool::{create_sqlite_pool, SqlitePool};
