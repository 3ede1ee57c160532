//! Client repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::crm::ClientRepository;
use printshop_domain::{Client, PrintShopError, Result as DomainResult};
use rusqlite::{params, Row};

use super::manager::DbManager;
use super::support::{contains_folded, fold_case, label, map_storage_error, spawn_db};

const CLIENT_COLUMNS: &str = "id, person_type, document_number, business_name, contact_name, \
     email, phone, address, department, province, district, ubigeo, created_at, updated_at";

/// SQLite-backed implementation of `ClientRepository`
pub struct SqliteClientRepository {
    db: Arc<DbManager>,
}

impl SqliteClientRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn list(&self) -> DomainResult<Vec<Client>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY business_name COLLATE NOCASE"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![], map_client_row).map_err(map_storage_error)
        })
        .await
    }

    async fn search(&self, query: &str, limit: usize) -> DomainResult<Vec<Client>> {
        let needle = fold_case(query.trim());
        let clients = self.list().await?;
        Ok(clients
            .into_iter()
            .filter(|client| {
                contains_folded(&client.business_name, &needle)
                    || contains_folded(&client.document_number, &needle)
            })
            .take(limit)
            .collect())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Client>> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
                params![id],
                map_client_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn find_by_document(&self, document_number: &str) -> DomainResult<Option<Client>> {
        let document_number = document_number.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE document_number = ?1"),
                params![document_number],
                map_client_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn create(&self, client: Client) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            conn.execute(
                "INSERT INTO clients (
                    id, person_type, document_number, business_name, contact_name, email, phone,
                    address, department, province, district, ubigeo, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    client.id,
                    client.person_type.as_str(),
                    client.document_number,
                    client.business_name,
                    client.contact_name,
                    client.email,
                    client.phone,
                    client.address,
                    client.department,
                    client.province,
                    client.district,
                    client.ubigeo,
                    client.created_at,
                    client.updated_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, client: Client) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE clients SET
                        person_type = ?1, document_number = ?2, business_name = ?3,
                        contact_name = ?4, email = ?5, phone = ?6, address = ?7,
                        department = ?8, province = ?9, district = ?10, ubigeo = ?11,
                        updated_at = ?12
                     WHERE id = ?13",
                    params![
                        client.person_type.as_str(),
                        client.document_number,
                        client.business_name,
                        client.contact_name,
                        client.email,
                        client.phone,
                        client.address,
                        client.department,
                        client.province,
                        client.district,
                        client.ubigeo,
                        client.updated_at,
                        client.id, // WHERE clause
                    ],
                )
                .map_err(map_storage_error)?;
            if updated == 0 {
                return Err(PrintShopError::NotFound(format!("Client {} not found", client.id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute("DELETE FROM clients WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }
}

fn map_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        person_type: label(row, 1)?,
        document_number: row.get(2)?,
        business_name: row.get(3)?,
        contact_name: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        address: row.get(7)?,
        department: row.get(8)?,
        province: row.get(9)?,
        district: row.get(10)?,
        ubigeo: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
