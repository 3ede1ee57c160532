//! CRM commands: clients, quotes and orders
//!
//! Requires a role that can open the `crm` module.

use printshop_core::crm::{CrmKpis, OrderDetail, OrderScope};
use printshop_domain::{Client, ClientInput, Module, Order, QuoteInput, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

async fn authorize(ctx: &AppContext) -> Result<()> {
    ctx.gate.require_module(Module::Crm).await.map(|_| ())
}

// =============================================================================
// Clients
// =============================================================================

pub async fn list_clients(ctx: &AppContext) -> CommandResult<Vec<Client>> {
    execute_command("crm::list_clients", || async {
        authorize(ctx).await?;
        ctx.clients.list().await
    })
    .await
}

/// Search by business name or document number
pub async fn search_clients(ctx: &AppContext, query: &str) -> CommandResult<Vec<Client>> {
    execute_command("crm::search_clients", || async {
        authorize(ctx).await?;
        ctx.clients.search(query).await
    })
    .await
}

pub async fn create_client(ctx: &AppContext, input: ClientInput) -> CommandResult<Client> {
    execute_command("crm::create_client", || async {
        authorize(ctx).await?;
        ctx.clients.create(input).await
    })
    .await
}

pub async fn update_client(
    ctx: &AppContext,
    id: &str,
    input: ClientInput,
) -> CommandResult<Client> {
    execute_command("crm::update_client", || async {
        authorize(ctx).await?;
        ctx.clients.update(id, input).await
    })
    .await
}

pub async fn delete_client(ctx: &AppContext, id: &str) -> CommandResult<()> {
    execute_command("crm::delete_client", || async {
        authorize(ctx).await?;
        ctx.clients.delete(id).await
    })
    .await
}

// =============================================================================
// Quotes and orders
// =============================================================================

pub async fn create_quote(ctx: &AppContext, input: QuoteInput) -> CommandResult<OrderDetail> {
    execute_command("crm::create_quote", || async {
        authorize(ctx).await?;
        ctx.orders.create_quote(input).await
    })
    .await
}

/// Replace the header fields and line items of a quote or order
pub async fn update_order(
    ctx: &AppContext,
    order_key: &str,
    input: QuoteInput,
) -> CommandResult<OrderDetail> {
    execute_command("crm::update_order", || async {
        authorize(ctx).await?;
        ctx.orders.update_order(order_key, input).await
    })
    .await
}

/// Turn an accepted quote into a production order (assigns the `OT-` id)
pub async fn convert_to_order(ctx: &AppContext, order_key: &str) -> CommandResult<Order> {
    execute_command("crm::convert_to_order", || async {
        authorize(ctx).await?;
        ctx.orders.convert_to_order(order_key).await
    })
    .await
}

pub async fn reject_quote(ctx: &AppContext, order_key: &str) -> CommandResult<Order> {
    execute_command("crm::reject_quote", || async {
        authorize(ctx).await?;
        ctx.orders.reject_quote(order_key).await
    })
    .await
}

pub async fn cancel_order(ctx: &AppContext, order_key: &str) -> CommandResult<Order> {
    execute_command("crm::cancel_order", || async {
        authorize(ctx).await?;
        ctx.orders.cancel_order(order_key).await
    })
    .await
}

pub async fn delete_order(ctx: &AppContext, order_key: &str) -> CommandResult<()> {
    execute_command("crm::delete_order", || async {
        authorize(ctx).await?;
        ctx.orders.delete_order(order_key).await
    })
    .await
}

pub async fn list_orders(ctx: &AppContext, scope: OrderScope) -> CommandResult<Vec<Order>> {
    execute_command("crm::list_orders", || async {
        authorize(ctx).await?;
        ctx.orders.list_orders(scope).await
    })
    .await
}

pub async fn get_order(ctx: &AppContext, order_key: &str) -> CommandResult<OrderDetail> {
    execute_command("crm::get_order", || async {
        authorize(ctx).await?;
        ctx.orders.get_order(order_key).await
    })
    .await
}

pub async fn crm_kpis(ctx: &AppContext) -> CommandResult<CrmKpis> {
    execute_command("crm::crm_kpis", || async {
        authorize(ctx).await?;
        ctx.orders.kpis().await
    })
    .await
}
