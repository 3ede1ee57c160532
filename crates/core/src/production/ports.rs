//! Port interfaces for phase records and incidents

use async_trait::async_trait;
use printshop_domain::{Incident, Phase, PhaseRecord, PhaseTask, QueueCandidate, Result};

#[async_trait]
pub trait PhaseRepository: Send + Sync {
    /// The record for `(order_id, phase)`, checklist merged over defaults
    async fn get(&self, order_id: &str, phase: Phase) -> Result<Option<PhaseRecord>>;

    /// Orders whose global status is the phase entry state, with the raw
    /// phase relation as the data source returns it
    async fn list_incoming(&self, phase: Phase) -> Result<Vec<QueueCandidate>>;

    /// Non-completed records held by `assignee_id`, most recently assigned
    /// first
    async fn list_assigned(&self, phase: Phase, assignee_id: &str) -> Result<Vec<PhaseTask>>;

    /// Every phase record of one order, in phase order
    async fn list_for_order(&self, order_id: &str) -> Result<Vec<PhaseRecord>>;
}

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn create(&self, incident: Incident) -> Result<()>;

    /// Oldest first
    async fn list_for_order(&self, order_id: &str) -> Result<Vec<Incident>>;
}
