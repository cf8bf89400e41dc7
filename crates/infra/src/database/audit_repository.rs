//! SQLite-backed audit trail.
//!
//! Implements the `AuditTrail` port. All database operations run in
//! `spawn_blocking` to avoid blocking the async runtime.

use std::path::Path;

use async_trait::async_trait;
use coresuite_core::AuditTrail;
use coresuite_domain::{AuditEntry, IntegrationError, Result as DomainResult};
use rusqlite::{params, Connection};
use tokio::task;

use super::pool::{create_sqlite_pool, SqlitePool};
use crate::errors::InfraError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    action TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Append-only `audit_log` table.
pub struct SqliteAuditRepository {
    pool: SqlitePool,
}

impl SqliteAuditRepository {
    /// Open the database at `path` and make sure `audit_log` exists.
    ///
    /// # Errors
    /// Returns `IntegrationError::Database` when the database cannot be
    /// opened or the table cannot be created.
    pub fn open(path: &Path) -> DomainResult<Self> {
        let pool = create_sqlite_pool(path)?;
        Self::with_pool(pool)
    }

    /// Wrap an existing pool, creating the table if needed.
    ///
    /// # Errors
    /// Returns `IntegrationError::Database` when the schema cannot be
    /// applied.
    pub fn with_pool(pool: SqlitePool) -> DomainResult<Self> {
        let conn = pool.get().map_err(map_infra)?;
        conn.execute_batch(SCHEMA).map_err(map_infra)?;
        Ok(Self { pool })
    }

    /// Most recent entries first.
    pub async fn recent(&self, limit: u32) -> DomainResult<Vec<AuditEntry>> {
        let pool = self.pool.clone();

        task::spawn_blocking(move || -> DomainResult<Vec<AuditEntry>> {
            let conn = pool.get().map_err(map_infra)?;
            query_recent(&conn, limit).map_err(map_infra)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl AuditTrail for SqliteAuditRepository {
    async fn record(&self, entry: &AuditEntry) -> DomainResult<()> {
        let pool = self.pool.clone();
        let entry = entry.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = pool.get().map_err(map_infra)?;
            insert_entry(&conn, &entry).map_err(map_infra)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn insert_entry(conn: &Connection, entry: &AuditEntry) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO audit_log (user_id, action, description) VALUES (?1, ?2, ?3)",
        params![entry.user_id, entry.action, entry.description],
    )?;
    Ok(())
}

fn query_recent(conn: &Connection, limit: u32) -> rusqlite::Result<Vec<AuditEntry>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, action, description
         FROM audit_log
         ORDER BY id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(AuditEntry { user_id: row.get(0)?, action: row.get(1)?, description: row.get(2)? })
    })?;
    rows.collect()
}

fn map_infra<E>(err: E) -> IntegrationError
where
    InfraError: From<E>,
{
    IntegrationError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> IntegrationError {
    if err.is_cancelled() {
        IntegrationError::Internal("blocking task cancelled".into())
    } else {
        IntegrationError::Internal(format!("blocking task failed: {err}"))
    }
}
