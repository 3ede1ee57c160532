//! Pooled SQLite connection wrapper

use std::ops::{Deref, DerefMut};

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{
    Connection as RusqliteConnection, Row, Statement as RusqliteStatement, ToSql, Transaction,
};
use tracing::instrument;

use crate::storage::error::{StorageError, StorageResult};

/// SQLite connection wrapper
///
/// Wraps a pooled rusqlite connection. The connection is automatically
/// returned to the pool when dropped.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
}

impl SqliteConnection {
    /// Create a new connection wrapper from a pooled connection
    pub fn new(conn: PooledConnection<SqliteConnectionManager>) -> Self {
        Self { inner: conn }
    }

    /// Get a reference to the inner connection
    pub fn inner(&self) -> &RusqliteConnection {
        &self.inner
    }

    /// Execute a statement and return the number of affected rows
    #[instrument(skip(self, params), fields(sql = %sql))]
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        self.inner.execute(sql, params).map_err(StorageError::from)
    }

    /// Execute a SQL query that returns a single row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn ToSql], f: F) -> StorageResult<T>
    where
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        self.inner.query_row(sql, params, f).map_err(StorageError::from)
    }

    /// Like [`Self::query_row`] but maps "no rows" to `None`
    pub fn query_optional<T, F>(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        f: F,
    ) -> StorageResult<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        match self.inner.query_row(sql, params, f) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(StorageError::from(err)),
        }
    }

    /// Prepare a SQL statement for efficient repeated execution
    #[instrument(skip(self), fields(sql = %sql))]
    pub fn prepare(&self, sql: &str) -> StorageResult<SqliteStatement<'_>> {
        let stmt = self.inner.prepare(sql).map_err(StorageError::from)?;

        Ok(SqliteStatement::new(stmt))
    }

    /// Begin a transaction; it rolls back on drop unless committed
    #[instrument(skip(self))]
    pub fn transaction(&mut self) -> StorageResult<Transaction<'_>> {
        self.inner.transaction().map_err(StorageError::from)
    }
}

impl Deref for SqliteConnection {
    type Target = RusqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SqliteConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Prepared statement wrapper
pub struct SqliteStatement<'conn> {
    inner: RusqliteStatement<'conn>,
}

impl<'conn> SqliteStatement<'conn> {
    /// Create a new statement wrapper
    pub fn new(stmt: RusqliteStatement<'conn>) -> Self {
        Self { inner: stmt }
    }

    /// Execute the statement with parameters
    pub fn execute(&mut self, params: &[&dyn ToSql]) -> StorageResult<usize> {
        self.inner.execute(params).map_err(StorageError::from)
    }

    /// Query with the statement and collect mapped rows
    pub fn query_map<T, F>(&mut self, params: &[&dyn ToSql], mut f: F) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let rows = self.inner.query_map(params, |row| f(row)).map_err(StorageError::from)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::storage::sqlite::{SqlitePool, SqlitePoolConfig};

    fn test_pool(dir: &TempDir) -> SqlitePool {
        SqlitePool::new(&dir.path().join("test.db"), SqlitePoolConfig::default()).unwrap()
    }

    #[test]
    fn test_connection_execute_and_query_row() {
        let temp_dir = TempDir::new().unwrap();
        let pool = test_pool(&temp_dir);
        let conn = pool.get_connection().unwrap();

        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", &[]).unwrap();
        let inserted = conn.execute("INSERT INTO test (name) VALUES (?1)", &[&"Bob"]).unwrap();
        assert_eq!(inserted, 1);

        let name: String =
            conn.query_row("SELECT name FROM test WHERE id = ?1", &[&1], |row| row.get(0)).unwrap();
        assert_eq!(name, "Bob");
    }

    #[test]
    fn test_query_optional_maps_missing_row_to_none() {
        let temp_dir = TempDir::new().unwrap();
        let pool = test_pool(&temp_dir);
        let conn = pool.get_connection().unwrap();

        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", &[]).unwrap();
        let missing: Option<String> = conn
            .query_optional("SELECT name FROM test WHERE id = ?1", &[&42], |row| row.get(0))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_prepare_and_query_map() {
        let temp_dir = TempDir::new().unwrap();
        let pool = test_pool(&temp_dir);
        let conn = pool.get_connection().unwrap();

        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", &[]).unwrap();
        let mut insert = conn.prepare("INSERT INTO test (name) VALUES (?1)").unwrap();
        insert.execute(&[&"Charlie"]).unwrap();
        insert.execute(&[&"Diana"]).unwrap();
        drop(insert);

        let mut select = conn.prepare("SELECT name FROM test ORDER BY id").unwrap();
        let names: Vec<String> = select.query_map(&[], |row| row.get(0)).unwrap();
        assert_eq!(names, vec!["Charlie".to_string(), "Diana".to_string()]);
    }

    #[test]
    fn test_uncommitted_transaction_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let pool = test_pool(&temp_dir);
        let mut conn = pool.get_connection().unwrap();

        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY)", &[]).unwrap();
        {
            let tx = conn.transaction().unwrap();
            tx.execute("INSERT INTO test (id) VALUES (1)", []).unwrap();
            // dropped without commit
        }

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM test", &[], |row| row.get(0)).unwrap();
        assert_eq!(count, 0);
    }
}
