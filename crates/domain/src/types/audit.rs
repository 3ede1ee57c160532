//! Audit trail entries

use serde::{Deserialize, Serialize};

/// One append-only audit row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    /// Action tag, see `constants::audit`
    pub action: String,
    pub details: String,
    pub user_id: Option<String>,
    pub user_email: String,
    pub created_at: i64,
}

impl AuditEntry {
    /// Case-insensitive substring match over the details text
    pub fn mentions(&self, needle: &str) -> bool {
        self.details.to_lowercase().contains(&needle.to_lowercase())
    }
}
