//! Admin console: staff, providers, production board and traceability

pub mod service;
pub mod stats;

pub use service::AdminService;
pub use stats::{BoardRow, DashboardStats, TraceEvent, TraceSource, Traceability, TrendPoint};
