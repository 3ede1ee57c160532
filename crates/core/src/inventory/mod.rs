//! Stock, providers and purchasing

pub mod ports;
pub mod reports;
pub mod service;

pub use ports::{ProductRepository, ProviderRepository, PurchaseOrderRepository};
pub use reports::{AbcDistribution, InventoryKpis, InventoryReport, ReplenishmentLine};
pub use service::{InventoryService, PurchaseOrderDocument, PurchaseOrderInput};
