//! Database maintenance commands

use std::sync::Arc;

use printshop_domain::{PrintShopError, Result};
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaInfo {
    pub path: String,
    pub schema_version: Option<i32>,
}

/// Apply the schema (idempotent) and report the resulting version
pub async fn migrate(ctx: &AppContext) -> CommandResult<SchemaInfo> {
    execute_command("database::migrate", || async {
        let db = Arc::clone(&ctx.db);
        run_blocking(move || {
            db.run_migrations()?;
            Ok(SchemaInfo {
                path: db.path().display().to_string(),
                schema_version: db.schema_version()?,
            })
        })
        .await
    })
    .await
}

pub async fn schema_info(ctx: &AppContext) -> CommandResult<SchemaInfo> {
    execute_command("database::schema_info", || async {
        let db = Arc::clone(&ctx.db);
        run_blocking(move || {
            Ok(SchemaInfo {
                path: db.path().display().to_string(),
                schema_version: db.schema_version()?,
            })
        })
        .await
    })
    .await
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PrintShopError::Internal(format!("database task failed: {e}")))?
}
