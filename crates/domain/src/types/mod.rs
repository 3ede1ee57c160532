//! Domain types and models

pub mod audit;
pub mod checklist;
pub mod client;
pub mod incident;
pub mod inventory;
pub mod invoice;
pub mod order;
pub mod phase;
pub mod related;
pub mod session;
pub mod status;
pub mod user;

pub use audit::AuditEntry;
pub use checklist::Checklist;
pub use client::{Client, ClientInput, DocumentType, PersonType};
pub use incident::Incident;
pub use inventory::{
    AbcClass, Product, ProductInput, Provider, ProviderInput, PurchaseOrder, PurchaseOrderItem,
    PurchaseOrderStatus,
};
pub use invoice::{Invoice, InvoiceKind};
pub use order::{
    round_money, BillingStatus, ItemInput, Milestone, Order, OrderItem, OrderMilestones,
    QuoteInput,
};
pub use phase::{PhaseAssignment, PhaseMetrics, PhaseRecord, PhaseTask, QueueCandidate};
pub use related::RelatedRecord;
pub use session::{Actor, Module, Role, Session};
pub use status::{OrderStatus, Phase, PhaseStatus};
pub use user::{UserInput, UserProfile, UserStatus};
