//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment when one is present
//! 2. Attempts to load from environment variables (`PRINTSHOP_DB_PATH` set)
//! 3. Otherwise falls back to the first config file found
//! 4. With no config file anywhere, uses built-in defaults
//!
//! ## Environment Variables
//! - `PRINTSHOP_DB_PATH`: Database file path (selects environment loading)
//! - `PRINTSHOP_DB_POOL_SIZE`: Connection pool size
//! - `PRINTSHOP_SESSION_PATH`: Session mirror file
//! - `PRINTSHOP_TAX_RATE`: Sales tax rate as a fraction (`0.18`)
//! - `PRINTSHOP_INVOICE_SERIES` / `PRINTSHOP_RECEIPT_SERIES`: Document series
//! - `PRINTSHOP_LOG_LEVEL`: Default log filter directive
//! - `PRINTSHOP_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./printshop.json` or `./printshop.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use printshop_domain::{
    BillingConfig, Config, DatabaseConfig, LoggingConfig, PrintShopError, Result, SessionConfig,
};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `PrintShopError::Config` if an environment value or the config
/// file found on disk is invalid.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if std::env::var_os("PRINTSHOP_DB_PATH").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::warn!("No configuration found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `PRINTSHOP_DB_PATH` is required; every other variable falls back to its
/// default.
///
/// # Errors
/// Returns `PrintShopError::Config` if the path is missing or a value does
/// not parse.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("PRINTSHOP_DB_PATH")?;
    let defaults = Config::default();

    let pool_size = env_parse("PRINTSHOP_DB_POOL_SIZE", defaults.database.pool_size)?;
    if pool_size == 0 {
        return Err(PrintShopError::Config("Invalid pool size: must be at least 1".to_string()));
    }

    let tax_rate = env_parse("PRINTSHOP_TAX_RATE", defaults.billing.tax_rate)?;
    if !(0.0..1.0).contains(&tax_rate) {
        return Err(PrintShopError::Config(format!("Invalid tax rate: {tax_rate}")));
    }

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size },
        session: SessionConfig {
            path: std::env::var("PRINTSHOP_SESSION_PATH").unwrap_or(defaults.session.path),
        },
        billing: BillingConfig {
            tax_rate,
            invoice_series: std::env::var("PRINTSHOP_INVOICE_SERIES")
                .unwrap_or(defaults.billing.invoice_series),
            receipt_series: std::env::var("PRINTSHOP_RECEIPT_SERIES")
                .unwrap_or(defaults.billing.receipt_series),
        },
        logging: LoggingConfig {
            level: std::env::var("PRINTSHOP_LOG_LEVEL").unwrap_or(defaults.logging.level),
            json: env_bool("PRINTSHOP_LOG_JSON", defaults.logging.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and
/// TOML (detected by file extension).
///
/// # Errors
/// Returns `PrintShopError::Config` if no file is found, it cannot be read,
/// or its contents are invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PrintShopError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PrintShopError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PrintShopError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PrintShopError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PrintShopError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PrintShopError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "printshop.json",
        "printshop.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut bases = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            bases.push(exe_dir.to_path_buf());
        }
    }

    bases
        .iter()
        .flat_map(|base| NAMES.iter().map(move |name| base.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        PrintShopError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| PrintShopError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
