//! Inventory service - products, providers and purchase orders

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use printshop_common::time::{Clock, SystemClock};
use printshop_common::validation::Validator;
use printshop_common::{RangeValidator, StringValidator};
use printshop_domain::constants::{audit, AUTO_SKU_PLACEHOLDER};
use printshop_domain::{
    round_money, PrintShopError, Product, ProductInput, Provider, PurchaseOrder, PurchaseOrderItem,
    PurchaseOrderStatus, Result,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::ports::{ProductRepository, ProviderRepository, PurchaseOrderRepository};
use super::reports::{InventoryKpis, InventoryReport};
use crate::audit::AuditService;
use crate::utils::{clean, codes, invalid_input};

/// Purchase order as drafted by the warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderInput {
    pub provider_id: String,
    pub items: Vec<PurchaseOrderItem>,
    pub comments: Option<String>,
}

/// Printable purchase order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderDocument {
    pub order: PurchaseOrder,
    pub provider: Option<Provider>,
    pub lines: Vec<DocumentLine>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLine {
    pub product_name: String,
    pub quantity: i64,
    pub agreed_price: f64,
    pub subtotal: f64,
}

pub struct InventoryService {
    products: Arc<dyn ProductRepository>,
    providers: Arc<dyn ProviderRepository>,
    purchases: Arc<dyn PurchaseOrderRepository>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl InventoryService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        providers: Arc<dyn ProviderRepository>,
        purchases: Arc<dyn PurchaseOrderRepository>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self { products, providers, purchases, audit, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.products.list().await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Product {id} not found")))
    }

    /// Create a product; a blank or `[Auto]` SKU is generated from the
    /// category
    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        validate_product(&input)?;
        let sku = match explicit_sku(input.sku.as_deref()) {
            Some(sku) => sku,
            None => codes::sku(input.category.as_deref(), &mut rand::thread_rng()),
        };

        let now = self.clock.now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku,
            name: input.name.trim().to_string(),
            description: clean(input.description),
            category: clean(input.category),
            abc_class: input.abc_class,
            stock: input.stock,
            min_stock: input.min_stock,
            unit_price: input.unit_price,
            provider_id: clean(input.provider_id),
            created_at: now,
            updated_at: now,
        };
        self.products.create(product.clone()).await?;
        self.audit
            .record(
                audit::PRODUCT_CREATED,
                &format!("Product {} ({}) created", product.name, product.sku),
            )
            .await;
        Ok(product)
    }

    /// Update a product, keeping its SKU unless a new one is given
    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let existing = self.get_product(id).await?;
        validate_product(&input)?;
        let product = Product {
            sku: explicit_sku(input.sku.as_deref()).unwrap_or_else(|| existing.sku.clone()),
            name: input.name.trim().to_string(),
            description: clean(input.description),
            category: clean(input.category),
            abc_class: input.abc_class,
            stock: input.stock,
            min_stock: input.min_stock,
            unit_price: input.unit_price,
            provider_id: clean(input.provider_id),
            updated_at: self.clock.now(),
            ..existing
        };
        self.products.update(product.clone()).await?;
        self.audit
            .record(audit::PRODUCT_UPDATED, &format!("Product {} updated", product.sku))
            .await;
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let product = self.get_product(id).await?;
        self.products.delete(id).await?;
        self.audit
            .record(audit::PRODUCT_DELETED, &format!("Product {} deleted", product.sku))
            .await;
        Ok(())
    }

    // ========================================================================
    // Providers
    // ========================================================================

    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.providers.list().await
    }

    pub async fn search_providers(&self, query: &str) -> Result<Vec<Provider>> {
        match query.trim() {
            "" => self.providers.list().await,
            query => self.providers.search(query).await,
        }
    }

    pub async fn provider_products(&self, provider_id: &str) -> Result<Vec<Product>> {
        self.products.list_by_provider(provider_id).await
    }

    // ========================================================================
    // Purchase orders
    // ========================================================================

    pub async fn list_purchase_orders(&self) -> Result<Vec<PurchaseOrder>> {
        self.purchases.list().await
    }

    pub async fn create_purchase_order(&self, input: PurchaseOrderInput) -> Result<PurchaseOrder> {
        let provider = self.providers.get(&input.provider_id).await?.ok_or_else(|| {
            PrintShopError::NotFound(format!("Provider {} not found", input.provider_id))
        })?;
        if input.items.is_empty() {
            return Err(PrintShopError::InvalidInput(
                "A purchase order needs at least one item".to_string(),
            ));
        }
        for item in &input.items {
            Validator::new()
                .check("product_name", &item.product_name, &StringValidator::new().not_empty())
                .check("quantity", &item.quantity, &RangeValidator::empty().min(1))
                .check("agreed_price", &item.agreed_price, &RangeValidator::empty().min(0.0))
                .finish()
                .map_err(invalid_input)?;
        }

        let now = self.clock.now();
        let year = DateTime::<Utc>::from_timestamp(now, 0).map_or(1970, |at| at.year());
        let items: Vec<PurchaseOrderItem> = input
            .items
            .into_iter()
            .map(|item| PurchaseOrderItem {
                product_name: item.product_name.trim().to_string(),
                ..item
            })
            .collect();
        let order = PurchaseOrder {
            id: Uuid::new_v4().to_string(),
            code: codes::purchase_order_code(year, &mut rand::thread_rng()),
            provider_id: provider.id.clone(),
            status: PurchaseOrderStatus::Sent,
            total: round_money(items.iter().map(line_subtotal).sum()),
            issued_at: now,
            received_at: None,
            comments: clean(input.comments),
            items,
        };
        self.purchases.create(order.clone()).await?;

        info!(
            code = %order.code,
            provider = %provider.name,
            total = order.total,
            "Purchase order issued"
        );
        self.audit
            .record(
                audit::PURCHASE_ORDER_CREATED,
                &format!("Purchase order {} sent to {}", order.code, provider.name),
            )
            .await;
        Ok(order)
    }

    /// Receive a sent purchase order (by id or code) into stock
    pub async fn receive_purchase_order(
        &self,
        key: &str,
        comments: Option<String>,
    ) -> Result<PurchaseOrder> {
        let order = self.require_purchase(key).await?;
        if order.status != PurchaseOrderStatus::Sent {
            return Err(PrintShopError::InvalidTransition(format!(
                "Purchase order {} is {} and cannot be received",
                order.code, order.status
            )));
        }

        let now = self.clock.now();
        let comments = clean(comments);
        if !self.purchases.receive(&order.id, comments.clone(), now).await? {
            return Err(PrintShopError::Conflict(format!(
                "Purchase order {} was received by someone else",
                order.code
            )));
        }

        info!(code = %order.code, items = order.items.len(), "Purchase order received");
        self.audit
            .record(audit::PURCHASE_RECEIVED, &format!("Purchase order {} received", order.code))
            .await;
        Ok(PurchaseOrder {
            status: PurchaseOrderStatus::Received,
            received_at: Some(now),
            comments: comments.or(order.comments.clone()),
            ..order
        })
    }

    pub async fn purchase_order_document(&self, key: &str) -> Result<PurchaseOrderDocument> {
        let order = self.require_purchase(key).await?;
        let provider = self.providers.get(&order.provider_id).await?;
        let lines: Vec<DocumentLine> = order
            .items
            .iter()
            .map(|item| DocumentLine {
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                agreed_price: item.agreed_price,
                subtotal: line_subtotal(item),
            })
            .collect();
        let total = round_money(lines.iter().map(|line| line.subtotal).sum());
        Ok(PurchaseOrderDocument { order, provider, lines, total })
    }

    // ========================================================================
    // Indicators
    // ========================================================================

    pub async fn kpis(&self) -> Result<InventoryKpis> {
        let products = self.products.list().await?;
        let purchases = self.purchases.list().await?;
        Ok(InventoryKpis::compute(&products, &purchases))
    }

    pub async fn report(&self) -> Result<InventoryReport> {
        let products = self.products.list().await?;
        let purchases = self.purchases.list().await?;
        Ok(InventoryReport::compute(&products, &purchases, self.clock.now()))
    }

    async fn require_purchase(&self, key: &str) -> Result<PurchaseOrder> {
        self.purchases
            .find(key.trim())
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Purchase order {key} not found")))
    }
}

fn line_subtotal(item: &PurchaseOrderItem) -> f64 {
    round_money(item.quantity as f64 * item.agreed_price)
}

fn explicit_sku(sku: Option<&str>) -> Option<String> {
    sku.map(str::trim)
        .filter(|sku| !sku.is_empty() && *sku != AUTO_SKU_PLACEHOLDER)
        .map(str::to_uppercase)
}

fn validate_product(input: &ProductInput) -> Result<()> {
    Validator::new()
        .check("name", &input.name, &StringValidator::new().not_empty().max_length(200))
        .check("stock", &input.stock, &RangeValidator::empty().min(0))
        .check("min_stock", &input.min_stock, &RangeValidator::empty().min(0))
        .check("unit_price", &input.unit_price, &RangeValidator::empty().min(0.0))
        .finish()
        .map_err(invalid_input)
}
