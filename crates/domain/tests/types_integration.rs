//! Integration tests for workflow and related-record types
//!
//! Scenarios follow an order through its phases using only the public
//! domain API.

use printshop_domain::types::{
    Checklist, Order, OrderStatus, Phase, PhaseAssignment, PhaseRecord, PhaseStatus,
    QueueCandidate, RelatedRecord,
};
use serde_json::json;

// ============================================================================
// Phase chaining
// ============================================================================

/// Entry statuses of consecutive phases are reachable by walking `next`
#[test]
fn test_phase_chain_covers_production_statuses() {
    let mut phase = Some(Phase::PrePress);
    let mut visited = Vec::new();
    while let Some(current) = phase {
        let entry = current.entry_status();
        assert!(entry.is_production());
        assert_eq!(entry.phase(), Some(current));
        assert_eq!(current.claimed_status().phase(), Some(current));
        visited.push(current);
        phase = current.next();
    }
    assert_eq!(visited, vec![Phase::PrePress, Phase::Press, Phase::PostPress]);
    assert!(OrderStatus::Completed.is_closed());
    assert_eq!(OrderStatus::Completed.phase(), None);
}

/// A seeded record is unassigned, pending and has the phase's checklist shape
#[test]
fn test_seeded_record_matches_phase_shape() {
    let record = PhaseRecord::seed("o-1", Phase::PostPress, 1_700_000_000);
    assert!(record.is_free());
    assert_eq!(record.status, PhaseStatus::Pending);
    assert_eq!(record.checklist.len(), 3);
    assert_eq!(record.checklist.completed_steps(), 0);
    assert_eq!(record.updated_at, 1_700_000_000);
}

// ============================================================================
// Checklist persistence
// ============================================================================

/// Legacy `pasoN` keys and numbered keys both load
#[test]
fn test_checklist_accepts_legacy_keys() {
    let stored = json!({ "paso1": true, "2": true });
    let checklist = Checklist::from_json(Phase::Press, &stored);
    assert!(checklist.is_complete());
    assert_eq!(checklist.to_json(), json!({ "1": true, "2": true }));
}

// ============================================================================
// Queue rows
// ============================================================================

fn queue_row(phase_record: serde_json::Value) -> serde_json::Value {
    json!({
        "order": {
            "id": "o-9",
            "code": "COT-00AB12",
            "production_id": "OT-5120",
            "status": "in_press",
            "client_id": null,
            "total": 120.0,
            "notes": null,
            "billing_status": "pending",
            "current_assignee_id": null,
            "assigned_at": null,
            "milestones": {},
            "created_at": 1,
            "updated_at": 2
        },
        "phase_record": phase_record
    })
}

/// Queue rows decode whatever shape the join produced
#[test]
fn test_queue_candidate_decodes_every_related_shape() {
    let as_array: QueueCandidate = serde_json::from_value(queue_row(json!([
        { "assignee_id": "u-7", "status": "assigned_to_press" }
    ])))
    .unwrap();
    let as_object: QueueCandidate = serde_json::from_value(queue_row(json!({
        "assignee_id": null, "status": "pending"
    })))
    .unwrap();
    let as_null: QueueCandidate = serde_json::from_value(queue_row(json!(null))).unwrap();

    assert_eq!(
        as_array.phase_record.first().and_then(|r| r.assignee_id.as_deref()),
        Some("u-7")
    );
    assert_eq!(
        as_object.phase_record.first(),
        Some(&PhaseAssignment { assignee_id: None, status: PhaseStatus::Pending })
    );
    assert_eq!(as_null.phase_record, RelatedRecord::None);

    let order: &Order = &as_null.order;
    assert_eq!(order.reference(), "OT-5120");
    assert_eq!(order.status, OrderStatus::InPress);
}
