//! Pull-queue filtering
//!
//! An order is free for a phase when no phase record exists or the record
//! has no assignee. The relation is normalized through
//! [`RelatedRecord::first`] whatever shape the data source used.

use printshop_domain::{Order, Phase, PhaseAssignment, QueueCandidate, RelatedRecord};

pub fn is_free(related: &RelatedRecord<PhaseAssignment>) -> bool {
    related.first().map_or(true, |record| record.assignee_id.is_none())
}

/// Orders waiting in `phase`'s queue, in the order the source listed them
pub fn filter_free(phase: Phase, candidates: Vec<QueueCandidate>) -> Vec<Order> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.order.status == phase.entry_status())
        .filter(|candidate| is_free(&candidate.phase_record))
        .map(|candidate| candidate.order)
        .collect()
}
