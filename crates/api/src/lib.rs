//! # PrintShop API
//!
//! Headless command layer and the `printshop` binary.
//!
//! This crate contains:
//! - Command functions per module (session, production, CRM, billing,
//!   inventory, admin, audit, health, database)
//! - Application context (dependency injection)
//! - Logging bootstrap and command execution logging
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the SQLite adapters into the core services
//! - Commands return `Result<T, String>` with operator-facing messages

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
