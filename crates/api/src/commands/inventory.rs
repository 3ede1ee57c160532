//! Inventory commands: products, providers, purchase orders and reports
//!
//! Requires a role that can open the `inventario` module.

use printshop_core::inventory::{
    InventoryKpis, InventoryReport, PurchaseOrderDocument, PurchaseOrderInput,
};
use printshop_domain::{Module, Product, ProductInput, Provider, PurchaseOrder, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

async fn authorize(ctx: &AppContext) -> Result<()> {
    ctx.gate.require_module(Module::Inventory).await.map(|_| ())
}

pub async fn list_products(ctx: &AppContext) -> CommandResult<Vec<Product>> {
    execute_command("inventory::list_products", || async {
        authorize(ctx).await?;
        ctx.inventory.list_products().await
    })
    .await
}

/// Create a product; a blank or `[Auto]` SKU is generated from the category
pub async fn create_product(ctx: &AppContext, input: ProductInput) -> CommandResult<Product> {
    execute_command("inventory::create_product", || async {
        authorize(ctx).await?;
        ctx.inventory.create_product(input).await
    })
    .await
}

pub async fn update_product(
    ctx: &AppContext,
    id: &str,
    input: ProductInput,
) -> CommandResult<Product> {
    execute_command("inventory::update_product", || async {
        authorize(ctx).await?;
        ctx.inventory.update_product(id, input).await
    })
    .await
}

pub async fn delete_product(ctx: &AppContext, id: &str) -> CommandResult<()> {
    execute_command("inventory::delete_product", || async {
        authorize(ctx).await?;
        ctx.inventory.delete_product(id).await
    })
    .await
}

pub async fn search_providers(ctx: &AppContext, query: &str) -> CommandResult<Vec<Provider>> {
    execute_command("inventory::search_providers", || async {
        authorize(ctx).await?;
        ctx.inventory.search_providers(query).await
    })
    .await
}

pub async fn provider_products(ctx: &AppContext, provider_id: &str) -> CommandResult<Vec<Product>> {
    execute_command("inventory::provider_products", || async {
        authorize(ctx).await?;
        ctx.inventory.provider_products(provider_id).await
    })
    .await
}

pub async fn list_purchase_orders(ctx: &AppContext) -> CommandResult<Vec<PurchaseOrder>> {
    execute_command("inventory::list_purchase_orders", || async {
        authorize(ctx).await?;
        ctx.inventory.list_purchase_orders().await
    })
    .await
}

pub async fn create_purchase_order(
    ctx: &AppContext,
    input: PurchaseOrderInput,
) -> CommandResult<PurchaseOrder> {
    execute_command("inventory::create_purchase_order", || async {
        authorize(ctx).await?;
        ctx.inventory.create_purchase_order(input).await
    })
    .await
}

/// Mark a sent purchase order as received and add its quantities to stock
pub async fn receive_purchase_order(
    ctx: &AppContext,
    key: &str,
    comments: Option<String>,
) -> CommandResult<PurchaseOrder> {
    execute_command("inventory::receive_purchase_order", || async {
        authorize(ctx).await?;
        ctx.inventory.receive_purchase_order(key, comments).await
    })
    .await
}

pub async fn purchase_order_document(
    ctx: &AppContext,
    key: &str,
) -> CommandResult<PurchaseOrderDocument> {
    execute_command("inventory::purchase_order_document", || async {
        authorize(ctx).await?;
        ctx.inventory.purchase_order_document(key).await
    })
    .await
}

pub async fn inventory_kpis(ctx: &AppContext) -> CommandResult<InventoryKpis> {
    execute_command("inventory::inventory_kpis", || async {
        authorize(ctx).await?;
        ctx.inventory.kpis().await
    })
    .await
}

pub async fn inventory_report(ctx: &AppContext) -> CommandResult<InventoryReport> {
    execute_command("inventory::inventory_report", || async {
        authorize(ctx).await?;
        ctx.inventory.report().await
    })
    .await
}
