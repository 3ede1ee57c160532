//! Invoice repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::crm::InvoiceRepository;
use printshop_domain::{Invoice, InvoiceKind, PrintShopError, Result as DomainResult};
use rusqlite::{params, Row};

use super::manager::DbManager;
use super::support::{label, map_storage_error, spawn_db};

const INVOICE_COLUMNS: &str = "id, order_id, kind, number, client_name, client_document, \
     client_address, subtotal, tax, total, issued_at";

/// SQLite-backed implementation of `InvoiceRepository`
pub struct SqliteInvoiceRepository {
    db: Arc<DbManager>,
}

impl SqliteInvoiceRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepository {
    async fn create(&self, invoice: Invoice) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            // The UNIQUE(order_id) constraint is the final guard against a
            // second invoice racing past the service check.
            let already_invoiced: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM invoices WHERE order_id = ?1)",
                    params![invoice.order_id],
                    |row| row.get(0),
                )
                .map_err(map_storage_error)?;
            if already_invoiced {
                return Err(PrintShopError::Conflict(
                    "This order has already been invoiced.".to_string(),
                ));
            }
            conn.execute(
                &format!(
                    "INSERT INTO invoices ({INVOICE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                params![
                    invoice.id,
                    invoice.order_id,
                    invoice.kind.as_str(),
                    invoice.number,
                    invoice.client_name,
                    invoice.client_document,
                    invoice.client_address,
                    invoice.subtotal,
                    invoice.tax,
                    invoice.total,
                    invoice.issued_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn find_by_order(&self, order_id: &str) -> DomainResult<Option<Invoice>> {
        let order_id = order_id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE order_id = ?1"),
                params![order_id],
                map_invoice_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn count_by_kind(&self, kind: InvoiceKind) -> DomainResult<u64> {
        spawn_db(&self.db, move |conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM invoices WHERE kind = ?1",
                    params![kind.as_str()],
                    |row| row.get(0),
                )
                .map_err(map_storage_error)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
    }

    async fn list(&self) -> DomainResult<Vec<Invoice>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY issued_at DESC, rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![], map_invoice_row).map_err(map_storage_error)
        })
        .await
    }
}

fn map_invoice_row(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: row.get(0)?,
        order_id: row.get(1)?,
        kind: label(row, 2)?,
        number: row.get(3)?,
        client_name: row.get(4)?,
        client_document: row.get(5)?,
        client_address: row.get(6)?,
        subtotal: row.get(7)?,
        tax: row.get(8)?,
        total: row.get(9)?,
        issued_at: row.get(10)?,
    })
}
