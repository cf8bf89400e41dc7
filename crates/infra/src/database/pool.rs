//! SQLite connection pool helpers

use std::path::Path;

use coresuite_domain::{IntegrationError, Result as DomainResult};
use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::InfraError;

/// Pooled SQLite connections.
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

const DEFAULT_POOL_SIZE: u32 = 4;

/// Open (creating if needed) the database at `path` behind an r2d2 pool.
///
/// Missing parent directories are created.
///
/// # Errors
/// Returns `IntegrationError::Storage` when the directory cannot be created
/// and `IntegrationError::Database` when the pool cannot open a connection.
pub fn create_sqlite_pool(path: &Path) -> DomainResult<SqlitePool> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| IntegrationError::from(InfraError::from(e)))?;
    }

    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch("PRAGMA busy_timeout = 5000;"));

    r2d2::Pool::builder()
        .max_size(DEFAULT_POOL_SIZE)
        .build(manager)
        .map_err(|e| IntegrationError::from(InfraError::from(e)))
}
