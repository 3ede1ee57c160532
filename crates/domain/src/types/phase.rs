//! Per-phase production records

use serde::{Deserialize, Serialize};

use super::checklist::Checklist;
use super::order::Order;
use super::related::RelatedRecord;
use super::status::{Phase, PhaseStatus};

/// Work record for one order in one phase
///
/// At most one record exists per `(order_id, phase)`. A record is seeded
/// unassigned with a fresh checklist when the previous phase finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseRecord {
    pub order_id: String,
    pub phase: Phase,
    pub assignee_id: Option<String>,
    pub status: PhaseStatus,
    pub checklist: Checklist,
    /// Press machine, set when the press phase is claimed
    pub machine: Option<String>,
    pub paper_consumption: Option<f64>,
    pub paper_waste: Option<f64>,
    pub assigned_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub updated_at: i64,
}

impl PhaseRecord {
    /// Unassigned, pending record with every step cleared
    pub fn seed(order_id: impl Into<String>, phase: Phase, now: i64) -> Self {
        Self {
            order_id: order_id.into(),
            phase,
            assignee_id: None,
            status: PhaseStatus::Pending,
            checklist: Checklist::new(phase),
            machine: None,
            paper_consumption: None,
            paper_waste: None,
            assigned_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    pub fn is_free(&self) -> bool {
        self.assignee_id.is_none()
    }

    pub fn is_held_by(&self, actor_id: &str) -> bool {
        self.assignee_id.as_deref() == Some(actor_id)
    }
}

/// Assignment slice of a phase record, as embedded in queue rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAssignment {
    pub assignee_id: Option<String>,
    pub status: PhaseStatus,
}

/// Paper usage reported when the press phase finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub paper_consumption: Option<f64>,
    pub paper_waste: Option<f64>,
}

impl PhaseMetrics {
    pub fn new(paper_consumption: f64, paper_waste: f64) -> Self {
        Self { paper_consumption: Some(paper_consumption), paper_waste: Some(paper_waste) }
    }
}

/// Order eligible for a phase queue, with its raw related phase record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueCandidate {
    pub order: Order,
    #[serde(default)]
    pub phase_record: RelatedRecord<PhaseAssignment>,
}

/// A claimed phase record joined with its order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTask {
    pub record: PhaseRecord,
    pub order: Order,
}
