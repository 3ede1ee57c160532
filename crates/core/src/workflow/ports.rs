//! Port interfaces for persisting workflow transitions

use async_trait::async_trait;
use printshop_domain::Result;

use super::transition::TransitionWrite;

/// Persists the result of one workflow transition
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Write the phase record upsert, the optional next-phase seed and the
    /// order update together.
    ///
    /// Implementations must apply all parts or none of them.
    async fn apply(&self, write: &TransitionWrite) -> Result<()>;
}
