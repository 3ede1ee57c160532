//! Billing commands, opened from the CRM module

use printshop_domain::{Invoice, InvoiceKind, Module};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

/// Issue the single invoice or receipt of an order
pub async fn generate_invoice(
    ctx: &AppContext,
    order_key: &str,
    kind: InvoiceKind,
) -> CommandResult<Invoice> {
    execute_command("billing::generate_invoice", || async {
        ctx.gate.require_module(Module::Crm).await?;
        ctx.billing.generate_invoice(order_key, kind).await
    })
    .await
}

pub async fn list_invoices(ctx: &AppContext) -> CommandResult<Vec<Invoice>> {
    execute_command("billing::list_invoices", || async {
        ctx.gate.require_module(Module::Crm).await?;
        ctx.billing.list_invoices().await
    })
    .await
}
