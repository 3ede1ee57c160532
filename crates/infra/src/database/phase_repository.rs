//! Phase record repository implementation using SQLite
//!
//! Checklists are stored as JSON objects and merged over the phase defaults
//! on read, so rows written with fewer (or legacy `pasoN`) keys still load.

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::production::PhaseRepository;
use printshop_domain::{
    Checklist, Phase, PhaseAssignment, PhaseRecord, PhaseTask, PhaseStatus, QueueCandidate,
    RelatedRecord, Result as DomainResult,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::manager::DbManager;
use super::order_repository::{map_order_row, ORDER_COLUMNS, ORDER_COLUMN_COUNT};
use super::support::{json_column, label, map_sql_error, map_storage_error, spawn_db};

/// Phase record columns in [`map_record_row`] order, qualified with `r`
pub(crate) const RECORD_COLUMNS: &str = "r.order_id, r.phase, r.assignee_id, r.status, \
     r.checklist, r.machine, r.paper_consumption, r.paper_waste, r.assigned_at, \
     r.completed_at, r.updated_at";

const RECORD_COLUMN_COUNT: usize = 11;

/// SQLite-backed implementation of `PhaseRepository`
pub struct SqlitePhaseRepository {
    db: Arc<DbManager>,
}

impl SqlitePhaseRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhaseRepository for SqlitePhaseRepository {
    async fn get(&self, order_id: &str, phase: Phase) -> DomainResult<Option<PhaseRecord>> {
        let order_id = order_id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM phase_records r
                     WHERE r.order_id = ?1 AND r.phase = ?2"
                ),
                params![order_id, phase.as_str()],
                |row| map_record_row(row, 0),
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn list_incoming(&self, phase: Phase) -> DomainResult<Vec<QueueCandidate>> {
        spawn_db(&self.db, move |conn| {
            // The relation comes back as a JSON array, the way an embedded
            // select returns it; the queue filter normalizes the shape.
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {ORDER_COLUMNS},
                        (SELECT json_group_array(json_object(
                                    'assignee_id', r.assignee_id, 'status', r.status))
                         FROM phase_records r
                         WHERE r.order_id = o.id AND r.phase = ?2) AS phase_record
                     FROM orders o
                     WHERE o.status = ?1
                     ORDER BY COALESCE(o.converted_at, o.created_at) ASC, o.rowid ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![phase.entry_status().as_str(), phase.as_str()], |row| {
                let order = map_order_row(row, 0)?;
                let related = json_column(row, ORDER_COLUMN_COUNT)?;
                let phase_record: RelatedRecord<PhaseAssignment> =
                    serde_json::from_value(related).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            ORDER_COLUMN_COUNT,
                            Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(QueueCandidate { order, phase_record })
            })
            .map_err(map_storage_error)
        })
        .await
    }

    async fn list_assigned(&self, phase: Phase, assignee_id: &str) -> DomainResult<Vec<PhaseTask>> {
        let assignee_id = assignee_id.to_string();
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {RECORD_COLUMNS}, {ORDER_COLUMNS}
                     FROM phase_records r
                     JOIN orders o ON o.id = r.order_id
                     WHERE r.phase = ?1 AND r.assignee_id = ?2 AND r.status <> ?3
                     ORDER BY r.assigned_at DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(
                params![phase.as_str(), assignee_id, PhaseStatus::Completed.as_str()],
                |row| {
                    Ok(PhaseTask {
                        record: map_record_row(row, 0)?,
                        order: map_order_row(row, RECORD_COLUMN_COUNT)?,
                    })
                },
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn list_for_order(&self, order_id: &str) -> DomainResult<Vec<PhaseRecord>> {
        let order_id = order_id.to_string();
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {RECORD_COLUMNS} FROM phase_records r WHERE r.order_id = ?1"
                ))
                .map_err(map_storage_error)?;
            let mut records =
                stmt.query_map(params![order_id], |row| map_record_row(row, 0))
                    .map_err(map_storage_error)?;
            records.sort_by_key(|record| record.phase);
            Ok(records)
        })
        .await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map [`RECORD_COLUMNS`] starting at column `offset` to a [`PhaseRecord`]
pub(crate) fn map_record_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<PhaseRecord> {
    let at = |idx: usize| offset + idx;
    let phase: Phase = label(row, at(1))?;
    Ok(PhaseRecord {
        order_id: row.get(at(0))?,
        phase,
        assignee_id: row.get(at(2))?,
        status: label(row, at(3))?,
        checklist: Checklist::from_json(phase, &json_column(row, at(4))?),
        machine: row.get(at(5))?,
        paper_consumption: row.get(at(6))?,
        paper_waste: row.get(at(7))?,
        assigned_at: row.get(at(8))?,
        completed_at: row.get(at(9))?,
        updated_at: row.get(at(10))?,
    })
}

/// Insert or replace the record for `(order_id, phase)`
pub(crate) fn upsert_record(conn: &Connection, record: &PhaseRecord) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO phase_records (
            order_id, phase, assignee_id, status, checklist, machine,
            paper_consumption, paper_waste, assigned_at, completed_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(order_id, phase) DO UPDATE SET
            assignee_id = excluded.assignee_id,
            status = excluded.status,
            checklist = excluded.checklist,
            machine = excluded.machine,
            paper_consumption = excluded.paper_consumption,
            paper_waste = excluded.paper_waste,
            assigned_at = excluded.assigned_at,
            completed_at = excluded.completed_at,
            updated_at = excluded.updated_at",
        params![
            record.order_id,
            record.phase.as_str(),
            record.assignee_id,
            record.status.as_str(),
            record.checklist.to_json().to_string(),
            record.machine,
            record.paper_consumption,
            record.paper_waste,
            record.assigned_at,
            record.completed_at,
            record.updated_at,
        ],
    )
    .map_err(map_sql_error)?;
    Ok(())
}
