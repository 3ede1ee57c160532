//! Shared plumbing for the SQLite repositories

use std::str::FromStr;
use std::sync::Arc;

use printshop_common::storage::{SqliteConnection, StorageError};
use printshop_domain::{PrintShopError, Result};
use rusqlite::types::Type;
use rusqlite::Row;
use tokio::task;

use super::manager::DbManager;
use crate::errors::InfraError;

/// Run `work` on a pooled connection off the async runtime
pub(crate) async fn spawn_db<T, F>(db: &Arc<DbManager>, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
{
    let db = Arc::clone(db);
    task::spawn_blocking(move || -> Result<T> {
        let mut conn = db.get_connection()?;
        work(&mut conn)
    })
    .await
    .map_err(map_join_error)?
}

pub(crate) fn map_storage_error(err: StorageError) -> PrintShopError {
    PrintShopError::from(InfraError::from(err))
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> PrintShopError {
    PrintShopError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> PrintShopError {
    PrintShopError::from(InfraError::from(err))
}

/// Read a status label column into its enum
pub(crate) fn label<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

/// Read a JSON text column
pub(crate) fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Unicode lowercase for text matching.
///
/// SQLite's `lower()`, `LIKE` and `NOCASE` only fold ASCII, so names such as
/// "Couché" or "Ñandú" are compared after folding on this side instead.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// True when `haystack` contains `needle`, ignoring case across Unicode
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

pub(crate) fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
