//! Admin commands: staff, providers, production board and reporting
//!
//! Only the admin role opens this module.

use printshop_core::admin::{BoardRow, DashboardStats, Traceability, TrendPoint};
use printshop_domain::{
    Module, Phase, PhaseRecord, Provider, ProviderInput, Result, UserInput, UserProfile,
};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

async fn authorize(ctx: &AppContext) -> Result<()> {
    ctx.gate.require_module(Module::Admin).await.map(|_| ())
}

// =============================================================================
// Staff
// =============================================================================

pub async fn list_users(ctx: &AppContext) -> CommandResult<Vec<UserProfile>> {
    execute_command("admin::list_users", || async {
        authorize(ctx).await?;
        ctx.admin.list_users().await
    })
    .await
}

pub async fn create_user(ctx: &AppContext, input: UserInput) -> CommandResult<UserProfile> {
    execute_command("admin::create_user", || async {
        authorize(ctx).await?;
        ctx.admin.create_user(input).await
    })
    .await
}

pub async fn update_user(
    ctx: &AppContext,
    id: &str,
    input: UserInput,
) -> CommandResult<UserProfile> {
    execute_command("admin::update_user", || async {
        authorize(ctx).await?;
        ctx.admin.update_user(id, input).await
    })
    .await
}

pub async fn delete_user(ctx: &AppContext, id: &str) -> CommandResult<()> {
    execute_command("admin::delete_user", || async {
        authorize(ctx).await?;
        ctx.admin.delete_user(id).await
    })
    .await
}

/// Staff currently signed in
pub async fn active_users(ctx: &AppContext) -> CommandResult<usize> {
    execute_command("admin::active_users", || async {
        authorize(ctx).await?;
        ctx.admin.active_users().await
    })
    .await
}

// =============================================================================
// Providers
// =============================================================================

pub async fn list_providers(ctx: &AppContext) -> CommandResult<Vec<Provider>> {
    execute_command("admin::list_providers", || async {
        authorize(ctx).await?;
        ctx.admin.list_providers().await
    })
    .await
}

pub async fn create_provider(ctx: &AppContext, input: ProviderInput) -> CommandResult<Provider> {
    execute_command("admin::create_provider", || async {
        authorize(ctx).await?;
        ctx.admin.create_provider(input).await
    })
    .await
}

pub async fn update_provider(
    ctx: &AppContext,
    id: &str,
    input: ProviderInput,
) -> CommandResult<Provider> {
    execute_command("admin::update_provider", || async {
        authorize(ctx).await?;
        ctx.admin.update_provider(id, input).await
    })
    .await
}

pub async fn delete_provider(ctx: &AppContext, id: &str) -> CommandResult<()> {
    execute_command("admin::delete_provider", || async {
        authorize(ctx).await?;
        ctx.admin.delete_provider(id).await
    })
    .await
}

// =============================================================================
// Production oversight
// =============================================================================

pub async fn production_board(ctx: &AppContext) -> CommandResult<Vec<BoardRow>> {
    execute_command("admin::production_board", || async {
        authorize(ctx).await?;
        ctx.admin.production_board().await
    })
    .await
}

/// Assign an order's phase to a staff member, or release it with `None`
pub async fn assign_order(
    ctx: &AppContext,
    order_key: &str,
    phase: Phase,
    user_id: Option<&str>,
) -> CommandResult<PhaseRecord> {
    execute_command("admin::assign_order", || async {
        authorize(ctx).await?;
        ctx.admin.assign(order_key, phase, user_id).await
    })
    .await
}

pub async fn dashboard_stats(ctx: &AppContext) -> CommandResult<DashboardStats> {
    execute_command("admin::dashboard_stats", || async {
        authorize(ctx).await?;
        ctx.admin.dashboard_stats().await
    })
    .await
}

pub async fn production_trend(ctx: &AppContext) -> CommandResult<Vec<TrendPoint>> {
    execute_command("admin::production_trend", || async {
        authorize(ctx).await?;
        ctx.admin.production_trend().await
    })
    .await
}

/// Timeline of an order by id, production id or quote code
pub async fn trace_order(ctx: &AppContext, key: &str) -> CommandResult<Traceability> {
    execute_command("admin::trace_order", || async {
        authorize(ctx).await?;
        ctx.admin.trace(key).await
    })
    .await
}
