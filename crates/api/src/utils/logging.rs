use std::time::Duration;

use printshop_domain::{LoggingConfig, PrintShopError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Output goes to stderr so
/// command results on stdout stay machine-readable. Fails if a subscriber
/// is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder =
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let installed = if config.json { builder.json().try_init() } else { builder.try_init() };
    installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"production::claim"`).
/// * `elapsed` - Duration the command execution took.
/// * `error_type` - `None` on success, otherwise the [`error_label`] of the
///   failure.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_type: Option<&str>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error_type {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => {
            warn!(command, duration_ms, error_type, "command_execution_failure")
        }
    }
}

/// Convert a `PrintShopError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &PrintShopError) -> &'static str {
    match error {
        PrintShopError::Database(_) => "database",
        PrintShopError::Config(_) => "config",
        PrintShopError::Auth(_) => "auth",
        PrintShopError::NotFound(_) => "not_found",
        PrintShopError::InvalidInput(_) => "invalid_input",
        PrintShopError::InvalidTransition(_) => "invalid_transition",
        PrintShopError::Conflict(_) => "conflict",
        PrintShopError::Internal(_) => "internal",
    }
}
