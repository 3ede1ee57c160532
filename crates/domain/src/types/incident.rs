//! Production incidents reported by operators

use serde::{Deserialize, Serialize};

use super::status::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub order_id: String,
    pub phase: Phase,
    /// Short category, e.g. "paper jam"
    pub kind: String,
    pub detail: String,
    pub reported_by: Option<String>,
    pub reported_at: i64,
}
