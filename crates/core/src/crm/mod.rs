//! Clients, quotes/orders and billing

pub mod billing;
pub mod clients;
pub mod orders;
pub mod ports;

pub use billing::BillingService;
pub use clients::ClientService;
pub use orders::{CrmKpis, OrderDetail, OrderScope, OrderService};
pub use ports::{ClientRepository, InvoiceRepository, OrderRepository};
