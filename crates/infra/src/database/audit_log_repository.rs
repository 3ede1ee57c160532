//! Append-only audit log backed by SQLite

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::audit::AuditLogRepository;
use printshop_domain::{AuditEntry, Result as DomainResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

use super::manager::DbManager;
use super::support::{limit_param, map_sql_error, map_storage_error, spawn_db};

const AUDIT_COLUMNS: &str = "id, action, details, user_id, user_email, created_at";

pub struct SqliteAuditLogRepository {
    db: Arc<DbManager>,
}

impl SqliteAuditLogRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepository for SqliteAuditLogRepository {
    async fn append(&self, entry: AuditEntry) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            conn.execute(
                &format!("INSERT INTO audit_log ({AUDIT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                params![
                    entry.id,
                    entry.action,
                    entry.details,
                    entry.user_id,
                    entry.user_email,
                    entry.created_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn list_recent(&self, limit: usize) -> DomainResult<Vec<AuditEntry>> {
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {AUDIT_COLUMNS} FROM audit_log
                     ORDER BY created_at DESC, rowid DESC LIMIT ?1"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![limit_param(limit)], map_audit_row).map_err(map_storage_error)
        })
        .await
    }

    async fn list_by_actions(&self, actions: &[&str], limit: usize) -> DomainResult<Vec<AuditEntry>> {
        if actions.is_empty() {
            return Ok(Vec::new());
        }
        let mut values: Vec<Value> =
            actions.iter().map(|action| Value::Text((*action).to_string())).collect();
        values.push(Value::Integer(limit_param(limit)));
        let placeholders = vec!["?"; actions.len()].join(", ");

        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .inner()
                .prepare(&format!(
                    "SELECT {AUDIT_COLUMNS} FROM audit_log
                     WHERE action IN ({placeholders})
                     ORDER BY created_at DESC, rowid DESC LIMIT ?"
                ))
                .map_err(map_sql_error)?;
            let rows = stmt.query_map(params_from_iter(values), map_audit_row).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
    }

    async fn search(&self, needle: &str) -> DomainResult<Vec<AuditEntry>> {
        let needle = needle.to_string();
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {AUDIT_COLUMNS} FROM audit_log ORDER BY created_at ASC, rowid ASC"
                ))
                .map_err(map_storage_error)?;
            let entries: Vec<AuditEntry> =
                stmt.query_map(params![], map_audit_row).map_err(map_storage_error)?;
            Ok(entries.into_iter().filter(|entry| entry.mentions(&needle)).collect())
        })
        .await
    }
}

fn map_audit_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        id: row.get(0)?,
        action: row.get(1)?,
        details: row.get(2)?,
        user_id: row.get(3)?,
        user_email: row.get(4)?,
        created_at: row.get(5)?,
    })
}
