//! Transactional persistence of workflow transitions

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::workflow::{AssignmentChange, OrderUpdate, TransitionWrite, WorkflowStore};
use printshop_domain::{PrintShopError, Result as DomainResult};
use rusqlite::{params, Connection};
use tracing::{debug, instrument};

use super::manager::DbManager;
use super::phase_repository::upsert_record;
use super::support::{map_sql_error, map_storage_error, spawn_db};

/// Writes the phase record, the next-phase seed and the order update in one
/// SQLite transaction
pub struct SqliteWorkflowStore {
    db: Arc<DbManager>,
}

impl SqliteWorkflowStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkflowStore for SqliteWorkflowStore {
    #[instrument(skip(self, write), fields(order_id = %write.order.order_id))]
    async fn apply(&self, write: &TransitionWrite) -> DomainResult<()> {
        let write = write.clone();
        spawn_db(&self.db, move |conn| {
            let tx = conn.transaction().map_err(map_storage_error)?;
            update_order(&tx, &write.order, write.at)?;
            upsert_record(&tx, &write.record)?;
            if let Some(seed) = &write.seed {
                upsert_record(&tx, seed)?;
            }
            tx.commit().map_err(map_sql_error)?;
            debug!(
                order_id = %write.order.order_id,
                phase = %write.record.phase,
                seeded = write.seed.is_some(),
                "workflow transition committed"
            );
            Ok(())
        })
        .await
    }
}

fn update_order(conn: &Connection, update: &OrderUpdate, at: i64) -> DomainResult<()> {
    let (mode, assignee) = match &update.assignment {
        AssignmentChange::Keep => ("keep", None),
        AssignmentChange::Set(user_id) => ("set", Some(user_id.as_str())),
        AssignmentChange::Clear => ("clear", None),
    };

    let updated = conn
        .execute(
            "UPDATE orders SET
                status = COALESCE(?1, status),
                current_assignee_id = CASE ?2
                    WHEN 'set' THEN ?3 WHEN 'clear' THEN NULL ELSE current_assignee_id END,
                assigned_at = CASE ?2
                    WHEN 'set' THEN ?4 WHEN 'clear' THEN NULL ELSE assigned_at END,
                updated_at = ?4
             WHERE id = ?5",
            params![update.status.map(|s| s.as_str()), mode, assignee, at, update.order_id],
        )
        .map_err(map_sql_error)?;
    if updated == 0 {
        return Err(PrintShopError::NotFound(format!("Order {} not found", update.order_id)));
    }

    for milestone in &update.milestones {
        // Column names come from the fixed milestone labels
        let column = milestone.as_str();
        conn.execute(
            &format!("UPDATE orders SET {column} = COALESCE({column}, ?1) WHERE id = ?2"),
            params![at, update.order_id],
        )
        .map_err(map_sql_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use printshop_core::workflow::OrderUpdate;
    use printshop_domain::{Milestone, OrderStatus, Phase, PhaseRecord};
    use tempfile::TempDir;

    use super::*;

    fn manager(dir: &TempDir) -> Arc<DbManager> {
        let db = DbManager::new(dir.path().join("shop.db"), 2).unwrap();
        db.run_migrations().unwrap();
        Arc::new(db)
    }

    fn seed_order(db: &DbManager) {
        db.get_connection()
            .unwrap()
            .execute(
                "INSERT INTO orders (id, code, production_id, status, created_at, updated_at)
                 VALUES ('o-1', 'COT-AAA111', 'OT-1001', 'order_created', 10, 10)",
                params![],
            )
            .unwrap();
    }

    fn write(order_id: &str, assignment: AssignmentChange) -> TransitionWrite {
        let mut record = PhaseRecord::seed(order_id, Phase::PrePress, 50);
        record.assignee_id = Some("u-1".into());
        TransitionWrite {
            record,
            seed: None,
            order: OrderUpdate {
                order_id: order_id.into(),
                status: Some(OrderStatus::DesignPending),
                milestones: vec![Milestone::DesignStarted],
                assignment,
            },
            at: 50,
        }
    }

    #[tokio::test]
    async fn missing_order_rolls_back_the_record() {
        let dir = TempDir::new().unwrap();
        let db = manager(&dir);
        let store = SqliteWorkflowStore::new(Arc::clone(&db));

        let err = store.apply(&write("ghost", AssignmentChange::Keep)).await.unwrap_err();
        assert!(matches!(err, PrintShopError::NotFound(_)));

        let count: i64 = db
            .get_connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM phase_records", params![], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn milestones_are_only_stamped_once() {
        let dir = TempDir::new().unwrap();
        let db = manager(&dir);
        seed_order(&db);
        let store = SqliteWorkflowStore::new(Arc::clone(&db));

        store.apply(&write("o-1", AssignmentChange::Set("u-1".into()))).await.unwrap();
        let mut again = write("o-1", AssignmentChange::Keep);
        again.at = 90;
        store.apply(&again).await.unwrap();

        let (started, assignee, assigned_at, updated_at): (i64, String, i64, i64) = db
            .get_connection()
            .unwrap()
            .query_row(
                "SELECT design_started_at, current_assignee_id, assigned_at, updated_at
                 FROM orders WHERE id = 'o-1'",
                params![],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(started, 50);
        assert_eq!(assignee, "u-1");
        assert_eq!(assigned_at, 50);
        assert_eq!(updated_at, 90);
    }

    #[tokio::test]
    async fn clearing_the_assignment_nulls_the_mirror() {
        let dir = TempDir::new().unwrap();
        let db = manager(&dir);
        seed_order(&db);
        let store = SqliteWorkflowStore::new(Arc::clone(&db));

        store.apply(&write("o-1", AssignmentChange::Set("u-1".into()))).await.unwrap();
        store.apply(&write("o-1", AssignmentChange::Clear)).await.unwrap();

        let assignee: Option<String> = db
            .get_connection()
            .unwrap()
            .query_row(
                "SELECT current_assignee_id FROM orders WHERE id = 'o-1'",
                params![],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(assignee, None);
    }
}
