//! Production commands: phase queues, claims, checklists and hand-offs
//!
//! Every command first checks that the signed-in role may open the phase's
//! module, then delegates to that phase's `PhaseService`.

use printshop_core::production::TaskDetail;
use printshop_core::workflow::ApprovalDecision;
use printshop_domain::{
    Incident, Order, OrderStatus, Phase, PhaseMetrics, PhaseRecord, PhaseTask, Result,
};
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

/// Result of closing a phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishOutcome {
    pub record: PhaseRecord,
    /// Global status the order moved to
    pub order_status: Option<OrderStatus>,
    /// Phase whose queue received the order, if any
    pub next_phase: Option<Phase>,
}

async fn authorize(ctx: &AppContext, phase: Phase) -> Result<()> {
    ctx.gate.require_module(phase.module()).await.map(|_| ())
}

/// Orders waiting in a phase's pull queue
pub async fn list_queue(ctx: &AppContext, phase: Phase) -> CommandResult<Vec<Order>> {
    execute_command("production::list_queue", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).list_incoming().await
    })
    .await
}

/// Phase records held by the signed-in operator
pub async fn list_my_tasks(ctx: &AppContext, phase: Phase) -> CommandResult<Vec<PhaseTask>> {
    execute_command("production::list_my_tasks", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).list_mine().await
    })
    .await
}

/// Pull an order from the queue for the signed-in operator
pub async fn claim_order(ctx: &AppContext, phase: Phase, order_key: &str) -> CommandResult<bool> {
    execute_command("production::claim_order", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).claim(order_key).await
    })
    .await
}

pub async fn get_task(ctx: &AppContext, phase: Phase, order_key: &str) -> CommandResult<TaskDetail> {
    execute_command("production::get_task", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).task(order_key).await
    })
    .await
}

/// Tick or untick a checklist step (1-based)
pub async fn update_checklist_step(
    ctx: &AppContext,
    phase: Phase,
    order_key: &str,
    step: usize,
    done: bool,
) -> CommandResult<PhaseRecord> {
    execute_command("production::update_checklist_step", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).advance(order_key, step, done).await
    })
    .await
}

pub async fn set_client_approval(
    ctx: &AppContext,
    order_key: &str,
    decision: ApprovalDecision,
) -> CommandResult<PhaseRecord> {
    execute_command("production::set_client_approval", || async {
        authorize(ctx, Phase::PrePress).await?;
        ctx.phase_service(Phase::PrePress).set_approval(order_key, decision).await
    })
    .await
}

/// Close a phase and hand the order to the next queue
pub async fn finish_phase(
    ctx: &AppContext,
    phase: Phase,
    order_key: &str,
    metrics: PhaseMetrics,
) -> CommandResult<FinishOutcome> {
    execute_command("production::finish_phase", || async {
        authorize(ctx, phase).await?;
        let transition = ctx.phase_service(phase).finish(order_key, metrics).await?;
        Ok(FinishOutcome {
            next_phase: transition.write.seed.as_ref().map(|seed| seed.phase),
            order_status: transition.write.order.status,
            record: transition.write.record,
        })
    })
    .await
}

pub async fn report_incident(
    ctx: &AppContext,
    phase: Phase,
    order_key: &str,
    kind: &str,
    detail: &str,
) -> CommandResult<Incident> {
    execute_command("production::report_incident", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).report_incident(order_key, kind, detail).await
    })
    .await
}

pub async fn list_incidents(
    ctx: &AppContext,
    phase: Phase,
    order_key: &str,
) -> CommandResult<Vec<Incident>> {
    execute_command("production::list_incidents", || async {
        authorize(ctx, phase).await?;
        ctx.phase_service(phase).incidents(order_key).await
    })
    .await
}
