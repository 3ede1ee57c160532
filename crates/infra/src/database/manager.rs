//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use printshop_common::storage::{SqliteConnection, SqlitePool, SqlitePoolConfig};
use printshop_domain::{DatabaseConfig, PrintShopError, Result};
use rusqlite::params;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
#[derive(Debug)]
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database file with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                PrintShopError::Config(format!(
                    "cannot create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let pool = SqlitePool::new(&path, SqlitePoolConfig::with_max_size(pool_size))
            .map_err(map_storage_error)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.metrics().max_pool_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Build from the `[database]` configuration section.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size)
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(map_storage_error)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)?;
        info!(version = SCHEMA_VERSION, "database schema ready");
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Perform a health check to verify database connectivity.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(map_storage_error)?;
        Ok(())
    }

    /// Latest applied schema version, `None` before the first migration.
    pub fn schema_version(&self) -> Result<Option<i32>> {
        let conn = self.get_connection()?;
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
                params![],
                |row| row.get(0),
            )
            .map_err(map_storage_error)?;
        if !exists {
            return Ok(None);
        }
        conn.query_row("SELECT MAX(version) FROM schema_version", params![], |row| row.get(0))
            .map_err(map_storage_error)
    }
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )
    .map_err(map_storage_error)?;
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> PrintShopError {
    PrintShopError::from(InfraError::from(err))
}

fn map_storage_error(err: printshop_common::storage::StorageError) -> PrintShopError {
    PrintShopError::from(InfraError::from(err))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn migrations_create_schema_version() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("manager created");
        assert_eq!(manager.schema_version().unwrap(), None);
        manager.run_migrations().expect("migrations run");
        manager.run_migrations().expect("migrations are idempotent");

        assert_eq!(manager.schema_version().unwrap(), Some(SCHEMA_VERSION));
        assert_eq!(manager.path(), db_path.as_path());
    }

    #[test]
    fn health_check_succeeds_for_valid_database() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager =
            DbManager::new(temp_dir.path().join("test.db"), 2).expect("manager created");
        manager.run_migrations().expect("migrations run");

        manager.health_check().expect("health check passed");
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let nested = temp_dir.path().join("data").join("shop").join("printshop.db");

        let manager = DbManager::from_config(&DatabaseConfig {
            path: nested.to_string_lossy().into_owned(),
            pool_size: 1,
        })
        .expect("manager created");
        manager.health_check().expect("health check passed");
        assert!(nested.exists());
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager =
            DbManager::new(temp_dir.path().join("test.db"), 1).expect("manager created");
        manager.run_migrations().expect("migrations run");

        let conn = manager.get_connection().unwrap();
        let err = conn
            .execute(
                "INSERT INTO order_items (id, order_id, position, product, quantity, unit_price, subtotal)
                 VALUES ('i-1', 'missing', 0, 'Flyers', 1, 1.0, 1.0)",
                params![],
            )
            .unwrap_err();
        assert!(matches!(map_storage_error(err), PrintShopError::Conflict(_)));
    }
}
