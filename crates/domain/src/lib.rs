//! # PrintShop Domain
//!
//! Business domain types and models for the print shop ERP.
//!
//! This crate contains:
//! - Order, phase, checklist and status types for the production workflow
//! - CRM, billing, inventory and user types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (audit action tags, code prefixes)
//!
//! ## Architecture
//! - No dependencies on other PrintShop crates
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
