//! Port interfaces for the audit log

use async_trait::async_trait;
use printshop_domain::{AuditEntry, Result};

/// Append-only audit log storage
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<()>;

    /// Newest first
    async fn list_recent(&self, limit: usize) -> Result<Vec<AuditEntry>>;

    /// Newest first, restricted to the given action tags
    async fn list_by_actions(&self, actions: &[&str], limit: usize) -> Result<Vec<AuditEntry>>;

    /// Entries whose details contain `needle`, oldest first
    async fn search(&self, needle: &str) -> Result<Vec<AuditEntry>>;
}
