//! Production incident repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::production::IncidentRepository;
use printshop_domain::{Incident, Result as DomainResult};
use rusqlite::{params, Row};

use super::manager::DbManager;
use super::support::{label, map_storage_error, spawn_db};

pub struct SqliteIncidentRepository {
    db: Arc<DbManager>,
}

impl SqliteIncidentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IncidentRepository for SqliteIncidentRepository {
    async fn create(&self, incident: Incident) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            conn.execute(
                "INSERT INTO incidents (id, order_id, phase, kind, detail, reported_by, reported_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    incident.id,
                    incident.order_id,
                    incident.phase.as_str(),
                    incident.kind,
                    incident.detail,
                    incident.reported_by,
                    incident.reported_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn list_for_order(&self, order_id: &str) -> DomainResult<Vec<Incident>> {
        let order_id = order_id.to_string();
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, order_id, phase, kind, detail, reported_by, reported_at
                     FROM incidents WHERE order_id = ?1
                     ORDER BY reported_at ASC, rowid ASC",
                )
                .map_err(map_storage_error)?;
            stmt.query_map(params![order_id], map_incident_row).map_err(map_storage_error)
        })
        .await
    }
}

fn map_incident_row(row: &Row<'_>) -> rusqlite::Result<Incident> {
    Ok(Incident {
        id: row.get(0)?,
        order_id: row.get(1)?,
        phase: label(row, 2)?,
        kind: row.get(3)?,
        detail: row.get(4)?,
        reported_by: row.get(5)?,
        reported_at: row.get(6)?,
    })
}
