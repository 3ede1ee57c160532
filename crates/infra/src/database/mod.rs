//! Database implementations

pub mod audit_log_repository;
pub mod client_repository;
pub mod incident_repository;
pub mod inventory_repository;
pub mod invoice_repository;
pub mod manager;
pub mod order_repository;
pub mod phase_repository;
mod support;
pub mod user_profile_repository;
pub mod workflow_store;

pub use audit_log_repository::*;
pub use client_repository::*;
pub use incident_repository::*;
pub use inventory_repository::*;
pub use invoice_repository::*;
pub use manager::*;
pub use order_repository::SqliteOrderRepository;
pub use phase_repository::SqlitePhaseRepository;
pub use user_profile_repository::*;
pub use workflow_store::*;
