//! # PrintShop Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for every core port, on the shared r2d2 pool
//! - The database schema and [`DbManager`]
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - The file-backed session mirror
//!
//! ## Architecture
//! - Implements traits defined in `printshop-core`
//! - Depends on `printshop-common` and `printshop-domain`
//! - Contains all "impure" code (I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod session;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use session::FileSessionStore;
