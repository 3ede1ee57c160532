//! Storage primitives for the local SQLite database
//!
//! Provides an r2d2 connection pool, a pooled connection wrapper,
//! per-connection pragmas and the storage error type.

pub mod error;
pub mod metrics;
pub mod sqlite;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use metrics::{PoolSnapshot, StorageMetrics};
pub use sqlite::{
    apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig, SqliteStatement,
};
