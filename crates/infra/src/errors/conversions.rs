//! Conversions from external infrastructure errors into domain errors.

use printshop_common::storage::StorageError;
use printshop_domain::PrintShopError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PrintShopError);

impl From<InfraError> for PrintShopError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PrintShopError> for InfraError {
    fn from(value: PrintShopError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPrintShopError {
    fn into_printshop(self) -> PrintShopError;
}

// SQLite extended result codes for constraint failures
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PrintShopError */
/* -------------------------------------------------------------------------- */

impl IntoPrintShopError for SqlError {
    fn into_printshop(self) -> PrintShopError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        PrintShopError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        PrintShopError::Database("database is locked".into())
                    }
                    (
                        ErrorCode::ConstraintViolation,
                        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY,
                    ) => PrintShopError::Conflict(unique_violation_message(&message)),
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        PrintShopError::Conflict(
                            "The record is still referenced by other records.".into(),
                        )
                    }
                    _ => PrintShopError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => PrintShopError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                PrintShopError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PrintShopError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                PrintShopError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                PrintShopError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => PrintShopError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => PrintShopError::Database("invalid SQL query".into()),
            other => PrintShopError::Database(other.to_string()),
        }
    }
}

/// Turn `UNIQUE constraint failed: clients.document_number` into a message an
/// operator can act on
fn unique_violation_message(message: &str) -> String {
    let columns = message
        .rsplit(": ")
        .next()
        .unwrap_or_default()
        .split(", ")
        .filter_map(|qualified| qualified.split('.').nth(1))
        .map(|column| column.replace('_', " "))
        .collect::<Vec<_>>();

    if columns.is_empty() {
        "A record with the same key already exists.".to_string()
    } else {
        format!("A record with the same {} already exists.", columns.join(" and "))
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_printshop())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → PrintShopError */
/* -------------------------------------------------------------------------- */

impl IntoPrintShopError for StorageError {
    fn into_printshop(self) -> PrintShopError {
        match self {
            StorageError::Rusqlite(err) => err.into_printshop(),
            StorageError::Timeout(secs) => {
                PrintShopError::Database(format!("no database connection available after {secs}s"))
            }
            StorageError::InvalidConfig(msg) => PrintShopError::Config(msg),
            StorageError::SerdeJson(err) => {
                PrintShopError::Internal(format!("stored JSON is malformed: {err}"))
            }
            other => PrintShopError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_printshop())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio JoinError → PrintShopError */
/* -------------------------------------------------------------------------- */

impl IntoPrintShopError for JoinError {
    fn into_printshop(self) -> PrintShopError {
        if self.is_cancelled() {
            PrintShopError::Internal("database task was cancelled".into())
        } else {
            PrintShopError::Internal(format!("database task panicked: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_printshop())
    }
}
