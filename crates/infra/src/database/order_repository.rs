//! Order and order item repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::crm::OrderRepository;
use printshop_domain::{
    BillingStatus, Order, OrderItem, OrderMilestones, OrderStatus, PrintShopError,
    Result as DomainResult,
};
use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::manager::DbManager;
use super::support::{label, map_sql_error, map_storage_error, spawn_db};

/// Order columns in [`map_order_row`] order, qualified with the `o` alias
pub(crate) const ORDER_COLUMNS: &str = "o.id, o.code, o.production_id, o.status, o.client_id, \
     o.total, o.notes, o.billing_status, o.current_assignee_id, o.assigned_at, \
     o.converted_at, o.design_started_at, o.approval_sent_at, o.press_queued_at, \
     o.prep_started_at, o.printing_started_at, o.press_finished_at, o.finishing_started_at, \
     o.quality_started_at, o.completed_at, o.created_at, o.updated_at";

/// Number of columns in [`ORDER_COLUMNS`]
pub(crate) const ORDER_COLUMN_COUNT: usize = 22;

/// SQLite-backed implementation of `OrderRepository`
pub struct SqliteOrderRepository {
    db: Arc<DbManager>,
}

impl SqliteOrderRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn create(&self, order: Order, items: Vec<OrderItem>) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            let tx = conn.transaction().map_err(map_storage_error)?;
            insert_order(&tx, &order)?;
            insert_items(&tx, &items)?;
            tx.commit().map_err(map_sql_error)?;
            debug!(order_id = %order.id, items = items.len(), "order inserted");
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Order>> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?1"),
                params![id],
                |row| map_order_row(row, 0),
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn find_by_reference(&self, key: &str) -> DomainResult<Option<Order>> {
        let key = key.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!(
                    "SELECT {ORDER_COLUMNS} FROM orders o
                     WHERE o.id = ?1 OR o.production_id = ?1 OR o.code = ?1
                     ORDER BY (o.id = ?1) DESC, (o.production_id = ?1) DESC
                     LIMIT 1"
                ),
                params![key],
                |row| map_order_row(row, 0),
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn list(&self) -> DomainResult<Vec<Order>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders o ORDER BY o.created_at DESC, o.rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![], |row| map_order_row(row, 0)).map_err(map_storage_error)
        })
        .await
    }

    async fn update(&self, order: &Order, items: Vec<OrderItem>) -> DomainResult<()> {
        let order = order.clone();
        spawn_db(&self.db, move |conn| {
            let tx = conn.transaction().map_err(map_storage_error)?;
            let updated = tx
                .execute(
                    "UPDATE orders SET client_id = ?1, notes = ?2, total = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![order.client_id, order.notes, order.total, order.updated_at, order.id],
                )
                .map_err(map_sql_error)?;
            if updated == 0 {
                return Err(PrintShopError::NotFound(format!("Order {} not found", order.id)));
            }
            tx.execute("DELETE FROM order_items WHERE order_id = ?1", params![order.id])
                .map_err(map_sql_error)?;
            insert_items(&tx, &items)?;
            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
    }

    async fn items(&self, order_id: &str) -> DomainResult<Vec<OrderItem>> {
        let order_id = order_id.to_string();
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, order_id, product, quantity, specifications, unit_price, subtotal
                     FROM order_items WHERE order_id = ?1 ORDER BY position",
                )
                .map_err(map_storage_error)?;
            stmt.query_map(params![order_id], map_item_row).map_err(map_storage_error)
        })
        .await
    }

    async fn set_status(&self, id: &str, status: OrderStatus, now: i64) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute(
                "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn convert(&self, id: &str, production_id: &str, now: i64) -> DomainResult<bool> {
        let id = id.to_string();
        let production_id = production_id.to_string();
        spawn_db(&self.db, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE orders
                     SET production_id = ?1, status = ?2,
                         converted_at = COALESCE(converted_at, ?3), updated_at = ?3
                     WHERE id = ?4 AND production_id IS NULL",
                    params![production_id, OrderStatus::OrderCreated.as_str(), now, id],
                )
                .map_err(map_storage_error)?;
            if updated == 1 {
                return Ok(true);
            }
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
                    params![id],
                    |row| row.get(0),
                )
                .map_err(map_storage_error)?;
            if exists {
                Ok(false)
            } else {
                Err(PrintShopError::NotFound(format!("Order {id} not found")))
            }
        })
        .await
    }

    async fn set_billing_status(
        &self,
        id: &str,
        status: BillingStatus,
        now: i64,
    ) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute(
                "UPDATE orders SET billing_status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            // Items, phase records and incidents cascade
            conn.execute("DELETE FROM orders WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map [`ORDER_COLUMNS`] starting at column `offset` to an [`Order`]
pub(crate) fn map_order_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Order> {
    let at = |idx: usize| offset + idx;
    Ok(Order {
        id: row.get(at(0))?,
        code: row.get(at(1))?,
        production_id: row.get(at(2))?,
        status: label(row, at(3))?,
        client_id: row.get(at(4))?,
        total: row.get(at(5))?,
        notes: row.get(at(6))?,
        billing_status: label(row, at(7))?,
        current_assignee_id: row.get(at(8))?,
        assigned_at: row.get(at(9))?,
        milestones: OrderMilestones {
            converted_at: row.get(at(10))?,
            design_started_at: row.get(at(11))?,
            approval_sent_at: row.get(at(12))?,
            press_queued_at: row.get(at(13))?,
            prep_started_at: row.get(at(14))?,
            printing_started_at: row.get(at(15))?,
            press_finished_at: row.get(at(16))?,
            finishing_started_at: row.get(at(17))?,
            quality_started_at: row.get(at(18))?,
            completed_at: row.get(at(19))?,
        },
        created_at: row.get(at(20))?,
        updated_at: row.get(at(21))?,
    })
}

fn map_item_row(row: &Row<'_>) -> rusqlite::Result<OrderItem> {
    Ok(OrderItem {
        id: row.get(0)?,
        order_id: row.get(1)?,
        product: row.get(2)?,
        quantity: row.get(3)?,
        specifications: row.get(4)?,
        unit_price: row.get(5)?,
        subtotal: row.get(6)?,
    })
}

fn insert_order(conn: &Connection, order: &Order) -> DomainResult<()> {
    let m = &order.milestones;
    conn.execute(
        "INSERT INTO orders (
            id, code, production_id, status, client_id, total, notes, billing_status,
            current_assignee_id, assigned_at, converted_at, design_started_at,
            approval_sent_at, press_queued_at, prep_started_at, printing_started_at,
            press_finished_at, finishing_started_at, quality_started_at, completed_at,
            created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        params![
            order.id,
            order.code,
            order.production_id,
            order.status.as_str(),
            order.client_id,
            order.total,
            order.notes,
            order.billing_status.as_str(),
            order.current_assignee_id,
            order.assigned_at,
            m.converted_at,
            m.design_started_at,
            m.approval_sent_at,
            m.press_queued_at,
            m.prep_started_at,
            m.printing_started_at,
            m.press_finished_at,
            m.finishing_started_at,
            m.quality_started_at,
            m.completed_at,
            order.created_at,
            order.updated_at,
        ],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn insert_items(conn: &Connection, items: &[OrderItem]) -> DomainResult<()> {
    let mut stmt = conn
        .prepare(
            "INSERT INTO order_items (
                id, order_id, position, product, quantity, specifications, unit_price, subtotal
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(map_sql_error)?;
    for (position, item) in (0_i64..).zip(items) {
        stmt.execute(params![
            item.id,
            item.order_id,
            position,
            item.product,
            item.quantity,
            item.specifications,
            item.unit_price,
            item.subtotal,
        ])
        .map_err(map_sql_error)?;
    }
    Ok(())
}
