//! # PrintShop Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The order workflow state machine and its engine
//! - Port/adapter interfaces (traits) for every repository
//! - Phase, CRM, billing, inventory, admin, audit and session services
//!
//! ## Architecture Principles
//! - Only depends on `printshop-common` and `printshop-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod admin;
pub mod audit;
pub mod crm;
pub mod inventory;
pub mod production;
pub mod session;
pub mod user;
pub mod utils;
pub mod workflow;

// Re-export specific items to avoid ambiguity
pub use admin::AdminService;
pub use audit::{AuditLogRepository, AuditService};
pub use crm::{
    BillingService, ClientRepository, ClientService, InvoiceRepository, OrderRepository,
    OrderService,
};
pub use inventory::{
    InventoryService, ProductRepository, ProviderRepository, PurchaseOrderRepository,
};
pub use production::{IncidentRepository, PhaseRepository, PhaseService};
pub use session::{SessionGate, SessionStore};
pub use user::UserProfileRepository;
pub use workflow::{WorkflowEngine, WorkflowStore};
