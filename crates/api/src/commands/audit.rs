//! Audit history commands

use printshop_domain::constants::audit;
use printshop_domain::{AuditEntry, Module, Phase};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

/// Action tags shown on a production module's history tab
pub const fn phase_history_actions(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::PrePress => &[
            audit::TASK_CLAIMED,
            audit::STEP_UPDATED,
            audit::CLIENT_APPROVAL,
            audit::DESIGN_FINISHED,
        ],
        Phase::Press => {
            &[audit::TASK_CLAIMED_PRESS, audit::PRINT_FINISHED, audit::PRESS_INCIDENT]
        }
        Phase::PostPress => &[audit::TASK_CLAIMED_POST, audit::ORDER_COMPLETED],
    }
}

/// Global history, newest first (admin only)
pub async fn recent_history(
    ctx: &AppContext,
    limit: Option<usize>,
) -> CommandResult<Vec<AuditEntry>> {
    execute_command("audit::recent_history", || async {
        ctx.gate.require_module(Module::Admin).await?;
        ctx.audit.recent(limit).await
    })
    .await
}

/// History of one production module
pub async fn phase_history(ctx: &AppContext, phase: Phase) -> CommandResult<Vec<AuditEntry>> {
    execute_command("audit::phase_history", || async {
        ctx.gate.require_module(phase.module()).await?;
        ctx.audit.history_for(phase_history_actions(phase)).await
    })
    .await
}

/// Entries whose details contain `needle`, oldest first (admin only)
pub async fn search_history(ctx: &AppContext, needle: &str) -> CommandResult<Vec<AuditEntry>> {
    execute_command("audit::search_history", || async {
        ctx.gate.require_module(Module::Admin).await?;
        ctx.audit.search(needle).await
    })
    .await
}
