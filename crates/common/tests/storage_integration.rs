//! Integration tests for the storage module
//!
//! Covers pooled connections, pragmas, transactions and foreign-key
//! enforcement as the infrastructure crate relies on them.

#![cfg(feature = "platform")]

use std::path::PathBuf;
use std::sync::Arc;

use printshop_common::storage::{SqlitePool, SqlitePoolConfig, StorageError};
use tempfile::TempDir;

fn temp_db_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("storage.db");
    (temp_dir, db_path)
}

#[test]
fn test_foreign_keys_cascade_through_pool_connections() {
    let (_dir, path) = temp_db_path();
    let pool = SqlitePool::new(&path, SqlitePoolConfig::with_max_size(2)).unwrap();
    let conn = pool.get_connection().unwrap();

    conn.execute_batch(
        "CREATE TABLE parent (id TEXT PRIMARY KEY);
         CREATE TABLE child (id TEXT PRIMARY KEY,
                             parent_id TEXT NOT NULL REFERENCES parent(id) ON DELETE CASCADE);
         INSERT INTO parent (id) VALUES ('p1');
         INSERT INTO child (id, parent_id) VALUES ('c1', 'p1');",
    )
    .unwrap();

    conn.execute("DELETE FROM parent WHERE id = ?1", &[&"p1"]).unwrap();

    let remaining: i64 = conn.query_row("SELECT COUNT(*) FROM child", &[], |r| r.get(0)).unwrap();
    assert_eq!(remaining, 0, "child rows should cascade with foreign keys enabled");
}

#[test]
fn test_foreign_key_violation_is_reported() {
    let (_dir, path) = temp_db_path();
    let pool = SqlitePool::new(&path, SqlitePoolConfig::default()).unwrap();
    let conn = pool.get_connection().unwrap();

    conn.execute_batch(
        "CREATE TABLE parent (id TEXT PRIMARY KEY);
         CREATE TABLE child (id TEXT PRIMARY KEY, parent_id TEXT NOT NULL REFERENCES parent(id));",
    )
    .unwrap();

    let result = conn.execute("INSERT INTO child (id, parent_id) VALUES ('c1', 'missing')", &[]);
    assert!(matches!(result, Err(StorageError::Rusqlite(_))));
}

#[test]
fn test_committed_transaction_is_visible_to_other_connections() {
    let (_dir, path) = temp_db_path();
    let pool = Arc::new(SqlitePool::new(&path, SqlitePoolConfig::default()).unwrap());

    {
        let mut conn = pool.get_connection().unwrap();
        conn.execute("CREATE TABLE entries (id INTEGER PRIMARY KEY, label TEXT)", &[]).unwrap();
        let tx = conn.transaction().unwrap();
        tx.execute("INSERT INTO entries (label) VALUES ('a')", []).unwrap();
        tx.execute("INSERT INTO entries (label) VALUES ('b')", []).unwrap();
        tx.commit().unwrap();
    }

    let reader = Arc::clone(&pool);
    let count = std::thread::spawn(move || {
        let conn = reader.get_connection().unwrap();
        conn.query_row("SELECT COUNT(*) FROM entries", &[], |r| r.get::<_, i64>(0)).unwrap()
    })
    .join()
    .unwrap();

    assert_eq!(count, 2);
}

#[test]
fn test_pool_state_reports_connections() {
    let (_dir, path) = temp_db_path();
    let pool = SqlitePool::new(&path, SqlitePoolConfig::with_max_size(3)).unwrap();
    let _conn = pool.get_connection().unwrap();

    let (open, _idle) = pool.state();
    assert!(open >= 1);
    assert_eq!(pool.metrics().max_pool_size(), 3);
}
