//! Inventory persistence: products, providers and purchase orders

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::inventory::{ProductRepository, ProviderRepository, PurchaseOrderRepository};
use printshop_domain::{
    PrintShopError, Product, Provider, PurchaseOrder, PurchaseOrderItem, PurchaseOrderStatus,
    Result as DomainResult,
};
use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument, warn};

use super::manager::DbManager;
use super::support::{
    contains_folded, fold_case, label, map_sql_error, map_storage_error, spawn_db,
};

const PRODUCT_COLUMNS: &str = "id, sku, name, description, category, abc_class, stock, \
     min_stock, unit_price, provider_id, created_at, updated_at";

const PROVIDER_COLUMNS: &str = "id, name, tax_id, contact, supplies, address, created_at, updated_at";

const PURCHASE_COLUMNS: &str =
    "id, code, provider_id, status, total, issued_at, received_at, comments";

// =============================================================================
// Products
// =============================================================================

pub struct SqliteProductRepository {
    db: Arc<DbManager>,
}

impl SqliteProductRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn list(&self) -> DomainResult<Vec<Product>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name COLLATE NOCASE"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![], map_product_row).map_err(map_storage_error)
        })
        .await
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Product>> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id],
                map_product_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn list_by_provider(&self, provider_id: &str) -> DomainResult<Vec<Product>> {
        let provider_id = provider_id.to_string();
        spawn_db(&self.db, move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE provider_id = ?1
                     ORDER BY name COLLATE NOCASE"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![provider_id], map_product_row).map_err(map_storage_error)
        })
        .await
    }

    async fn create(&self, product: Product) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO products ({PRODUCT_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
                ),
                params![
                    product.id,
                    product.sku,
                    product.name,
                    product.description,
                    product.category,
                    product.abc_class.as_str(),
                    product.stock,
                    product.min_stock,
                    product.unit_price,
                    product.provider_id,
                    product.created_at,
                    product.updated_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, product: Product) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE products SET
                        sku = ?1, name = ?2, description = ?3, category = ?4, abc_class = ?5,
                        stock = ?6, min_stock = ?7, unit_price = ?8, provider_id = ?9,
                        updated_at = ?10
                     WHERE id = ?11",
                    params![
                        product.sku,
                        product.name,
                        product.description,
                        product.category,
                        product.abc_class.as_str(),
                        product.stock,
                        product.min_stock,
                        product.unit_price,
                        product.provider_id,
                        product.updated_at,
                        product.id,
                    ],
                )
                .map_err(map_storage_error)?;
            if updated == 0 {
                return Err(PrintShopError::NotFound(format!("Product {} not found", product.id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute("DELETE FROM products WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }
}

// =============================================================================
// Providers
// =============================================================================

pub struct SqliteProviderRepository {
    db: Arc<DbManager>,
}

impl SqliteProviderRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProviderRepository for SqliteProviderRepository {
    async fn list(&self) -> DomainResult<Vec<Provider>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PROVIDER_COLUMNS} FROM providers ORDER BY name COLLATE NOCASE"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![], map_provider_row).map_err(map_storage_error)
        })
        .await
    }

    async fn search(&self, query: &str) -> DomainResult<Vec<Provider>> {
        let needle = fold_case(query.trim());
        let providers = self.list().await?;
        Ok(providers
            .into_iter()
            .filter(|provider| {
                let fields =
                    [Some(provider.name.as_str()), provider.tax_id.as_deref(), provider.supplies.as_deref()];
                fields
                    .into_iter()
                    .flatten()
                    .any(|field| contains_folded(field, &needle))
            })
            .collect())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Provider>> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = ?1"),
                params![id],
                map_provider_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn create(&self, provider: Provider) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO providers ({PROVIDER_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                params![
                    provider.id,
                    provider.name,
                    provider.tax_id,
                    provider.contact,
                    provider.supplies,
                    provider.address,
                    provider.created_at,
                    provider.updated_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, provider: Provider) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE providers SET name = ?1, tax_id = ?2, contact = ?3, supplies = ?4,
                        address = ?5, updated_at = ?6
                     WHERE id = ?7",
                    params![
                        provider.name,
                        provider.tax_id,
                        provider.contact,
                        provider.supplies,
                        provider.address,
                        provider.updated_at,
                        provider.id,
                    ],
                )
                .map_err(map_storage_error)?;
            if updated == 0 {
                return Err(PrintShopError::NotFound(format!(
                    "Provider {} not found",
                    provider.id
                )));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute("DELETE FROM providers WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }
}

// =============================================================================
// Purchase orders
// =============================================================================

pub struct SqlitePurchaseOrderRepository {
    db: Arc<DbManager>,
}

impl SqlitePurchaseOrderRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PurchaseOrderRepository for SqlitePurchaseOrderRepository {
    async fn list(&self) -> DomainResult<Vec<PurchaseOrder>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PURCHASE_COLUMNS} FROM purchase_orders
                     ORDER BY issued_at DESC, rowid DESC"
                ))
                .map_err(map_storage_error)?;
            let mut orders =
                stmt.query_map(params![], map_purchase_row).map_err(map_storage_error)?;
            drop(stmt);
            for order in &mut orders {
                order.items = load_purchase_items(conn, &order.id)?;
            }
            Ok(orders)
        })
        .await
    }

    async fn find(&self, key: &str) -> DomainResult<Option<PurchaseOrder>> {
        let key = key.trim().to_string();
        spawn_db(&self.db, move |conn| {
            let found = conn
                .query_optional(
                    &format!(
                        "SELECT {PURCHASE_COLUMNS} FROM purchase_orders
                         WHERE id = ?1 OR code = upper(?1)
                         ORDER BY (id = ?1) DESC LIMIT 1"
                    ),
                    params![key],
                    map_purchase_row,
                )
                .map_err(map_storage_error)?;
            match found {
                Some(mut order) => {
                    order.items = load_purchase_items(conn, &order.id)?;
                    Ok(Some(order))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn create(&self, order: PurchaseOrder) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            let tx = conn.transaction().map_err(map_storage_error)?;
            tx.execute(
                &format!(
                    "INSERT INTO purchase_orders ({PURCHASE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                params![
                    order.id,
                    order.code,
                    order.provider_id,
                    order.status.as_str(),
                    order.total,
                    order.issued_at,
                    order.received_at,
                    order.comments,
                ],
            )
            .map_err(map_sql_error)?;
            for (position, item) in order.items.iter().enumerate() {
                tx.execute(
                    "INSERT INTO purchase_order_items
                        (purchase_order_id, position, product_name, quantity, agreed_price)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        order.id,
                        i64::try_from(position).unwrap_or(i64::MAX),
                        item.product_name,
                        item.quantity,
                        item.agreed_price,
                    ],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;
            debug!(code = %order.code, items = order.items.len(), "purchase order inserted");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, comments))]
    async fn receive(&self, id: &str, comments: Option<String>, now: i64) -> DomainResult<bool> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            let tx = conn.transaction().map_err(map_storage_error)?;
            let updated = tx
                .execute(
                    "UPDATE purchase_orders
                     SET status = ?1, received_at = ?2, comments = COALESCE(?3, comments)
                     WHERE id = ?4 AND status = ?5",
                    params![
                        PurchaseOrderStatus::Received.as_str(),
                        now,
                        comments,
                        id,
                        PurchaseOrderStatus::Sent.as_str(),
                    ],
                )
                .map_err(map_sql_error)?;
            if updated == 0 {
                return Ok(false);
            }

            let catalog = load_product_names(&tx)?;
            for item in load_purchase_items(&tx, &id)? {
                let wanted = fold_case(&item.product_name);
                let matches: Vec<&str> = catalog
                    .iter()
                    .filter(|(_, name)| fold_case(name) == wanted)
                    .map(|(product_id, _)| product_id.as_str())
                    .collect();
                if matches.is_empty() {
                    warn!(
                        purchase_order_id = %id,
                        product = %item.product_name,
                        "received item does not match any product"
                    );
                    continue;
                }
                for product_id in matches {
                    tx.execute(
                        "UPDATE products SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3",
                        params![item.quantity, now, product_id],
                    )
                    .map_err(map_sql_error)?;
                }
            }
            tx.commit().map_err(map_sql_error)?;
            Ok(true)
        })
        .await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// `(id, name)` of every product
fn load_product_names(conn: &Connection) -> DomainResult<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT id, name FROM products").map_err(map_sql_error)?;
    let rows = stmt
        .query_map(params![], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(map_sql_error)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
}

fn load_purchase_items(conn: &Connection, purchase_id: &str) -> DomainResult<Vec<PurchaseOrderItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT product_name, quantity, agreed_price FROM purchase_order_items
             WHERE purchase_order_id = ?1 ORDER BY position",
        )
        .map_err(map_sql_error)?;
    let rows = stmt
        .query_map(params![purchase_id], |row| {
            Ok(PurchaseOrderItem {
                product_name: row.get(0)?,
                quantity: row.get(1)?,
                agreed_price: row.get(2)?,
            })
        })
        .map_err(map_sql_error)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
}

fn map_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        sku: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        abc_class: label(row, 5)?,
        stock: row.get(6)?,
        min_stock: row.get(7)?,
        unit_price: row.get(8)?,
        provider_id: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn map_provider_row(row: &Row<'_>) -> rusqlite::Result<Provider> {
    Ok(Provider {
        id: row.get(0)?,
        name: row.get(1)?,
        tax_id: row.get(2)?,
        contact: row.get(3)?,
        supplies: row.get(4)?,
        address: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_purchase_row(row: &Row<'_>) -> rusqlite::Result<PurchaseOrder> {
    Ok(PurchaseOrder {
        id: row.get(0)?,
        code: row.get(1)?,
        provider_id: row.get(2)?,
        status: label(row, 3)?,
        total: row.get(4)?,
        issued_at: row.get(5)?,
        received_at: row.get(6)?,
        comments: row.get(7)?,
        items: Vec::new(),
    })
}
