//! Command execution helpers
//!
//! Every command goes through [`execute_command`] so timing, logging and the
//! operator-facing error text are handled in one place.

use std::future::Future;
use std::time::Instant;

use printshop_domain::Result as DomainResult;
use tracing::error;

use crate::utils::logging::{error_label, log_command_execution};

/// What every command returns: the value, or a message fit for an operator
pub type CommandResult<T> = Result<T, String>;

/// Execute a command with timing and structured logging
///
/// Storage and internal failures are logged with their full detail here,
/// since the caller only sees the generic operator message.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn claim(ctx: &AppContext, phase: Phase, key: &str) -> CommandResult<bool> {
///     execute_command("production::claim", || async {
///         ctx.phase_service(phase).claim(key).await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> CommandResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    execute_with_logging(command_name, command_fn).await.map_err(|e| e.user_message())
}

/// Same as [`execute_command`] but keeps the domain error
pub async fn execute_with_logging<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let elapsed = start.elapsed();
    let error_type = result.as_ref().err().map(error_label);
    if let Err(err) = &result {
        if matches!(error_type, Some("database" | "internal" | "config")) {
            error!(command = command_name, error = %err, "command failed");
        }
    }
    log_command_execution(command_name, elapsed, error_type);

    result
}

#[cfg(test)]
mod tests {
    use printshop_domain::PrintShopError;

    use super::*;

    #[tokio::test]
    async fn workflow_errors_keep_their_wording() {
        let result: Result<(), String> = execute_command("test::invalid", || async {
            Err(PrintShopError::InvalidTransition("Checklist step 4 is locked".into()))
        })
        .await;
        assert_eq!(result.unwrap_err(), "Checklist step 4 is locked");
    }

    #[tokio::test]
    async fn storage_errors_are_generic() {
        let result: Result<(), String> = execute_command("test::storage", || async {
            Err(PrintShopError::Database("disk I/O error".into()))
        })
        .await;
        assert_eq!(result.unwrap_err(), "The operation could not be completed. Please try again.");
    }

    #[tokio::test]
    async fn success_passes_the_value_through() {
        let value = execute_command("test::ok", || async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }
}
