//! Best-effort audit trail

pub mod ports;
pub mod service;

pub use ports::AuditLogRepository;
pub use service::AuditService;
