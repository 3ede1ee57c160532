//! The single authoritative transition function for production phases

use printshop_domain::constants::{audit, DEFAULT_PRESS_MACHINE};
use printshop_domain::{
    Checklist, Milestone, Order, OrderStatus, Phase, PhaseMetrics, PhaseRecord, PhaseStatus,
    PrintShopError, Result,
};
use serde::{Deserialize, Serialize};

/// Client decision on a submitted design proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    ChangesRequested,
}

/// Something that happened to an order within one phase
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// An operator pulls the order from the phase queue
    Claim { actor_id: String },
    /// A checklist step was ticked or unticked
    Step { step: usize, done: bool },
    /// Client answer to the design proof (pre-press only)
    Approval(ApprovalDecision),
    /// The operator closes the phase
    Finish(PhaseMetrics),
    /// Manual assignment from the admin board; `None` unassigns
    Assign { assignee_id: Option<String> },
}

/// What happens to the assignee mirror on the order row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentChange {
    Keep,
    Set(String),
    Clear,
}

/// Changes to the order row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderUpdate {
    pub order_id: String,
    pub status: Option<OrderStatus>,
    /// Milestones to stamp; already-set milestones are left untouched
    pub milestones: Vec<Milestone>,
    pub assignment: AssignmentChange,
}

/// Everything a transition writes, applied as one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionWrite {
    pub record: PhaseRecord,
    /// Next-phase record seeded by a finish
    pub seed: Option<PhaseRecord>,
    pub order: OrderUpdate,
    pub at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub action: &'static str,
    pub detail: String,
}

/// Outcome of applying one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub write: TransitionWrite,
    pub audit: AuditEvent,
}

impl Transition {
    /// Global status after the transition
    pub fn status_after(&self, before: OrderStatus) -> OrderStatus {
        self.write.order.status.unwrap_or(before)
    }
}

/// Decide how `event` moves `order` within `phase`
///
/// `current` is the stored phase record, if any. Nothing is written here;
/// the caller persists [`Transition::write`].
///
/// # Errors
/// `InvalidTransition` when the order or record state does not allow the
/// event, `InvalidInput` for malformed events (unknown step, bad metrics).
pub fn apply(
    order: &Order,
    phase: Phase,
    current: Option<&PhaseRecord>,
    event: WorkflowEvent,
    now: i64,
) -> Result<Transition> {
    match event {
        WorkflowEvent::Claim { actor_id } => claim(order, phase, current, actor_id, now),
        WorkflowEvent::Step { step, done } => {
            let record = active_record(order, phase, current)?;
            advance(order, record, step, done, now)
        }
        WorkflowEvent::Approval(decision) => {
            let record = active_record(order, phase, current)?;
            approve(order, record, decision, now)
        }
        WorkflowEvent::Finish(metrics) => {
            let record = active_record(order, phase, current)?;
            finish(order, record, metrics, now)
        }
        WorkflowEvent::Assign { assignee_id } => assign(order, phase, current, assignee_id, now),
    }
}

// ============================================================================
// Claim / assign
// ============================================================================

fn claim(
    order: &Order,
    phase: Phase,
    current: Option<&PhaseRecord>,
    actor_id: String,
    now: i64,
) -> Result<Transition> {
    let reclaim = order.status == phase.claimed_status();
    if order.status != phase.entry_status() && !reclaim {
        return Err(PrintShopError::InvalidTransition(format!(
            "Order {} is not waiting in the {} queue (status {})",
            order.reference(),
            phase.title(),
            order.status
        )));
    }
    // A concurrent claim may overwrite another claim, never started work
    if reclaim && current.is_some_and(|record| record.checklist.completed_steps() > 0) {
        return Err(PrintShopError::InvalidTransition(format!(
            "Order {} is already in progress in {}",
            order.reference(),
            phase.title()
        )));
    }

    let mut record = current.cloned().unwrap_or_else(|| PhaseRecord::seed(&order.id, phase, now));
    record.assignee_id = Some(actor_id.clone());
    record.status = phase.claimed_phase_status();
    record.checklist = Checklist::new(phase);
    record.assigned_at = Some(now);
    record.completed_at = None;
    record.updated_at = now;
    if phase == Phase::Press {
        record.machine = Some(DEFAULT_PRESS_MACHINE.to_string());
    }

    let action = match phase {
        Phase::PrePress => audit::TASK_CLAIMED,
        Phase::Press => audit::TASK_CLAIMED_PRESS,
        Phase::PostPress => audit::TASK_CLAIMED_POST,
    };
    Ok(Transition {
        write: TransitionWrite {
            record,
            seed: None,
            order: OrderUpdate {
                order_id: order.id.clone(),
                status: Some(phase.claimed_status()),
                milestones: Vec::new(),
                assignment: AssignmentChange::Set(actor_id),
            },
            at: now,
        },
        audit: AuditEvent {
            action,
            detail: format!("Order {} claimed in {}", order.reference(), phase.title()),
        },
    })
}

fn assign(
    order: &Order,
    phase: Phase,
    current: Option<&PhaseRecord>,
    assignee_id: Option<String>,
    now: i64,
) -> Result<Transition> {
    if order.status.phase() != Some(phase) {
        return Err(PrintShopError::InvalidTransition(format!(
            "Order {} is not in {} (status {})",
            order.reference(),
            phase.title(),
            order.status
        )));
    }

    let mut record = current.cloned().unwrap_or_else(|| PhaseRecord::seed(&order.id, phase, now));
    if record.status.is_terminal() {
        return Err(PrintShopError::InvalidTransition(format!(
            "{} is already finished for order {}",
            phase.title(),
            order.reference()
        )));
    }
    record.updated_at = now;

    let (status, assignment, detail) = match assignee_id {
        Some(user_id) => {
            record.assignee_id = Some(user_id.clone());
            record.assigned_at = Some(now);
            if record.status == PhaseStatus::Pending {
                record.status = phase.claimed_phase_status();
            }
            if phase == Phase::Press && record.machine.is_none() {
                record.machine = Some(DEFAULT_PRESS_MACHINE.to_string());
            }
            let status = (order.status == phase.entry_status()).then(|| phase.claimed_status());
            let detail =
                format!("Order {} in {} assigned to {user_id}", order.reference(), phase.title());
            (status, AssignmentChange::Set(user_id), detail)
        }
        None => {
            record.assignee_id = None;
            record.assigned_at = None;
            record.status = PhaseStatus::Pending;
            record.checklist = Checklist::new(phase);
            let status = (order.status != phase.entry_status()).then(|| phase.entry_status());
            let detail = format!("Order {} in {} unassigned", order.reference(), phase.title());
            (status, AssignmentChange::Clear, detail)
        }
    };

    Ok(Transition {
        write: TransitionWrite {
            record,
            seed: None,
            order: OrderUpdate {
                order_id: order.id.clone(),
                status,
                milestones: Vec::new(),
                assignment,
            },
            at: now,
        },
        audit: AuditEvent { action: audit::ORDER_ASSIGNED, detail },
    })
}

// ============================================================================
// Checklist steps
// ============================================================================

fn active_record(order: &Order, phase: Phase, current: Option<&PhaseRecord>) -> Result<PhaseRecord> {
    if order.status.phase() != Some(phase) {
        return Err(PrintShopError::InvalidTransition(format!(
            "Order {} is not in {} (status {})",
            order.reference(),
            phase.title(),
            order.status
        )));
    }
    let record = current.filter(|record| record.assignee_id.is_some()).ok_or_else(|| {
        PrintShopError::InvalidTransition(format!(
            "Order {} has not been claimed in {}",
            order.reference(),
            phase.title()
        ))
    })?;
    if record.status.is_terminal() {
        return Err(PrintShopError::InvalidTransition(format!(
            "{} is already finished for order {}",
            phase.title(),
            order.reference()
        )));
    }
    Ok(record.clone())
}

fn advance(
    order: &Order,
    mut record: PhaseRecord,
    step: usize,
    done: bool,
    now: i64,
) -> Result<Transition> {
    let phase = record.phase;
    let was = record.checklist.get(step).ok_or_else(|| {
        PrintShopError::InvalidInput(format!(
            "{} checklist has steps 1 to {}, got {step}",
            phase.title(),
            record.checklist.len()
        ))
    })?;

    if done && step > 1 && record.checklist.get(step - 1) != Some(true) {
        return Err(PrintShopError::InvalidTransition(format!(
            "Step {} must be completed before step {step}",
            step - 1
        )));
    }
    if !done && record.checklist.get(step + 1) == Some(true) {
        return Err(PrintShopError::InvalidTransition(format!(
            "Step {} must be undone before step {step}",
            step + 1
        )));
    }
    if phase == Phase::PrePress && step == 4 && done && record.status != PhaseStatus::DesignApproved
    {
        return Err(PrintShopError::InvalidTransition(format!(
            "Order {} needs client approval before the final artwork step",
            order.reference()
        )));
    }

    let rising = done && !was;
    let falling = !done && was;
    let next_status = step_status(phase, record.status, step, rising, falling);
    record.checklist.set(step, done)?;
    record.updated_at = now;

    let mut update = OrderUpdate {
        order_id: order.id.clone(),
        status: None,
        milestones: Vec::new(),
        assignment: AssignmentChange::Keep,
    };
    if let Some(status) = next_status.filter(|status| *status != record.status) {
        record.status = status;
        update.milestones.extend(milestone_for(status));
        update.status = order_status_for(status).filter(|global| *global != order.status);
    }

    let detail = format!(
        "Order {} {} step {step} marked {}",
        order.reference(),
        phase.title(),
        if done { "done" } else { "pending" }
    );
    Ok(Transition {
        write: TransitionWrite { record, seed: None, order: update, at: now },
        audit: AuditEvent { action: audit::STEP_UPDATED, detail },
    })
}

/// Phase status a checklist change leads to, if any
fn step_status(
    phase: Phase,
    current: PhaseStatus,
    step: usize,
    rising: bool,
    falling: bool,
) -> Option<PhaseStatus> {
    match phase {
        Phase::PrePress => {
            if step == 3 && rising {
                Some(PhaseStatus::AwaitingClientApproval)
            } else if current == PhaseStatus::ChangesRequested {
                Some(PhaseStatus::InDesign)
            } else if step == 1 && rising {
                Some(PhaseStatus::InDesign)
            } else if step == 3
                && falling
                && matches!(
                    current,
                    PhaseStatus::AwaitingClientApproval | PhaseStatus::DesignApproved
                )
            {
                Some(PhaseStatus::InDesign)
            } else {
                None
            }
        }
        Phase::Press => match (step, rising) {
            (1, true) => Some(PhaseStatus::PressPrep),
            (2, true) => Some(PhaseStatus::Printing),
            _ => None,
        },
        Phase::PostPress => match (step, rising) {
            (1, true) => Some(PhaseStatus::InFinishing),
            (3, true) => Some(PhaseStatus::QualityControl),
            _ => None,
        },
    }
}

/// Global status mirrored from a phase-local status
fn order_status_for(status: PhaseStatus) -> Option<OrderStatus> {
    match status {
        PhaseStatus::DesignPending => Some(OrderStatus::DesignPending),
        PhaseStatus::InDesign => Some(OrderStatus::InDesign),
        PhaseStatus::AwaitingClientApproval => Some(OrderStatus::AwaitingClientApproval),
        PhaseStatus::ChangesRequested => Some(OrderStatus::ChangesRequested),
        PhaseStatus::DesignApproved => Some(OrderStatus::DesignApproved),
        PhaseStatus::AssignedToPress => Some(OrderStatus::AssignedToPress),
        PhaseStatus::PressPrep => Some(OrderStatus::PressPrep),
        PhaseStatus::Printing => Some(OrderStatus::Printing),
        PhaseStatus::InFinishing => Some(OrderStatus::InFinishing),
        PhaseStatus::QualityControl => Some(OrderStatus::QualityControl),
        PhaseStatus::Pending | PhaseStatus::Completed => None,
    }
}

fn milestone_for(status: PhaseStatus) -> Option<Milestone> {
    match status {
        PhaseStatus::InDesign => Some(Milestone::DesignStarted),
        PhaseStatus::AwaitingClientApproval => Some(Milestone::ApprovalSent),
        PhaseStatus::PressPrep => Some(Milestone::PrepStarted),
        PhaseStatus::Printing => Some(Milestone::PrintingStarted),
        PhaseStatus::InFinishing => Some(Milestone::FinishingStarted),
        PhaseStatus::QualityControl => Some(Milestone::QualityStarted),
        _ => None,
    }
}

// ============================================================================
// Approval / finish
// ============================================================================

fn approve(
    order: &Order,
    mut record: PhaseRecord,
    decision: ApprovalDecision,
    now: i64,
) -> Result<Transition> {
    if record.phase != Phase::PrePress {
        return Err(PrintShopError::InvalidInput(format!(
            "Client approval only applies to pre-press, not {}",
            record.phase.title()
        )));
    }
    if record.status != PhaseStatus::AwaitingClientApproval {
        return Err(PrintShopError::InvalidTransition(format!(
            "Order {} is not awaiting client approval (status {})",
            order.reference(),
            record.status
        )));
    }

    let (status, detail) = match decision {
        ApprovalDecision::Approved => (
            PhaseStatus::DesignApproved,
            format!("Client approved the design of order {}", order.reference()),
        ),
        ApprovalDecision::ChangesRequested => {
            record.checklist.reset_from(3);
            (
                PhaseStatus::ChangesRequested,
                format!("Client requested changes to order {}", order.reference()),
            )
        }
    };
    record.status = status;
    record.updated_at = now;

    Ok(Transition {
        write: TransitionWrite {
            record,
            seed: None,
            order: OrderUpdate {
                order_id: order.id.clone(),
                status: order_status_for(status),
                milestones: Vec::new(),
                assignment: AssignmentChange::Keep,
            },
            at: now,
        },
        audit: AuditEvent { action: audit::CLIENT_APPROVAL, detail },
    })
}

fn finish(
    order: &Order,
    mut record: PhaseRecord,
    metrics: PhaseMetrics,
    now: i64,
) -> Result<Transition> {
    let phase = record.phase;
    if !record.checklist.is_complete() {
        return Err(PrintShopError::InvalidTransition(format!(
            "{} checklist for order {} is incomplete ({}/{} steps)",
            phase.title(),
            order.reference(),
            record.checklist.completed_steps(),
            record.checklist.len()
        )));
    }

    if phase == Phase::Press {
        let (Some(consumption), Some(waste)) = (metrics.paper_consumption, metrics.paper_waste)
        else {
            return Err(PrintShopError::InvalidInput(
                "Paper consumption and waste are required to finish printing".to_string(),
            ));
        };
        if !consumption.is_finite() || !waste.is_finite() || consumption < 0.0 || waste < 0.0 {
            return Err(PrintShopError::InvalidInput(
                "Paper consumption and waste must be non-negative numbers".to_string(),
            ));
        }
        record.paper_consumption = Some(consumption);
        record.paper_waste = Some(waste);
    }

    record.status = PhaseStatus::Completed;
    record.completed_at = Some(now);
    record.updated_at = now;

    let next = phase.next();
    let seed = next.map(|next| PhaseRecord::seed(&order.id, next, now));
    let status = next.map_or(OrderStatus::Completed, Phase::entry_status);
    let (milestone, action, detail) = match phase {
        Phase::PrePress => (
            Milestone::PressQueued,
            audit::DESIGN_FINISHED,
            format!("Order {} passed to press", order.reference()),
        ),
        Phase::Press => (
            Milestone::PressFinished,
            audit::PRINT_FINISHED,
            format!(
                "Order {} printed (paper {} / waste {})",
                order.reference(),
                record.paper_consumption.unwrap_or_default(),
                record.paper_waste.unwrap_or_default()
            ),
        ),
        Phase::PostPress => (
            Milestone::Completed,
            audit::ORDER_COMPLETED,
            format!("Order {} completed", order.reference()),
        ),
    };

    Ok(Transition {
        write: TransitionWrite {
            record,
            seed,
            order: OrderUpdate {
                order_id: order.id.clone(),
                status: Some(status),
                milestones: vec![milestone],
                assignment: AssignmentChange::Clear,
            },
            at: now,
        },
        audit: AuditEvent { action, detail },
    })
}
