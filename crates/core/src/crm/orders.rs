//! Quotes and production orders

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_domain::constants::audit;
use printshop_domain::{
    BillingStatus, Client, ItemInput, Order, OrderItem, OrderMilestones, OrderStatus,
    PrintShopError, QuoteInput, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{ClientRepository, OrderRepository};
use crate::audit::AuditService;
use crate::utils::{clean, codes};

const CONVERSION_ATTEMPTS: usize = 5;

/// Which orders a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderScope {
    #[default]
    All,
    Quotes,
    Production,
}

impl OrderScope {
    fn includes(self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Quotes => order.status.is_quote(),
            Self::Production => !order.status.is_quote(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub client: Option<Client>,
}

/// Headline counters for the CRM dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrmKpis {
    pub active_quotes: usize,
    pub active_production: usize,
    pub rejected_or_cancelled: usize,
    pub completed: usize,
}

impl CrmKpis {
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut kpis, order| {
            match order.status {
                status if status.is_quote() => kpis.active_quotes += 1,
                OrderStatus::Rejected | OrderStatus::Cancelled => kpis.rejected_or_cancelled += 1,
                OrderStatus::Completed => kpis.completed += 1,
                _ => kpis.active_production += 1,
            }
            kpis
        })
    }
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    clients: Arc<dyn ClientRepository>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        clients: Arc<dyn ClientRepository>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self { orders, clients, audit, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create a quote in negotiation with its line items
    pub async fn create_quote(&self, input: QuoteInput) -> Result<OrderDetail> {
        validate_items(&input.items)?;
        let client = self.resolve_client(input.client_id.as_deref()).await?;

        let now = self.clock.now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            code: codes::quote_code(self.clock.now_millis()),
            production_id: None,
            status: OrderStatus::QuoteNegotiation,
            client_id: client.as_ref().map(|c| c.id.clone()),
            total: input.total(),
            notes: clean(input.notes.clone()),
            billing_status: BillingStatus::Pending,
            current_assignee_id: None,
            assigned_at: None,
            milestones: OrderMilestones::default(),
            created_at: now,
            updated_at: now,
        };
        let items = build_items(&order.id, &input.items);
        self.orders.create(order.clone(), items.clone()).await?;

        info!(order_id = %order.id, code = %order.code, total = order.total, "Quote created");
        self.audit
            .record(
                audit::QUOTE_CREATED,
                &format!("Quote {} created for {:.2}", order.code, order.total),
            )
            .await;
        Ok(OrderDetail { order, items, client })
    }

    /// Rewrite header and items of an open order
    pub async fn update_order(&self, key: &str, input: QuoteInput) -> Result<OrderDetail> {
        let existing = self.require(key).await?;
        if existing.status.is_closed() {
            return Err(PrintShopError::InvalidTransition(format!(
                "Order {} is {} and can no longer be edited",
                existing.reference(),
                existing.status
            )));
        }
        validate_items(&input.items)?;
        let client = self.resolve_client(input.client_id.as_deref()).await?;

        let order = Order {
            client_id: client.as_ref().map(|c| c.id.clone()),
            total: input.total(),
            notes: clean(input.notes.clone()),
            updated_at: self.clock.now(),
            ..existing
        };
        let items = build_items(&order.id, &input.items);
        self.orders.update(&order, items.clone()).await?;
        self.audit
            .record(audit::ORDER_UPDATED, &format!("Order {} updated", order.reference()))
            .await;
        Ok(OrderDetail { order, items, client })
    }

    /// Turn a quote into a production order
    ///
    /// The production id is assigned once; converting again fails and never
    /// changes it.
    pub async fn convert_to_order(&self, key: &str) -> Result<Order> {
        let order = self.require(key).await?;
        if let Some(production_id) = order.production_id.as_deref() {
            return Err(PrintShopError::Conflict(format!(
                "Quote {} was already converted to {production_id}",
                order.code
            )));
        }
        if !order.status.is_quote() {
            return Err(PrintShopError::InvalidTransition(format!(
                "Order {} is {} and cannot be converted",
                order.reference(),
                order.status
            )));
        }

        let now = self.clock.now();
        for attempt in 1..=CONVERSION_ATTEMPTS {
            let production_id = codes::production_id(&mut rand::thread_rng());
            match self.orders.convert(&order.id, &production_id, now).await {
                Ok(true) => {
                    info!(order_id = %order.id, %production_id, "Quote converted");
                    self.audit
                        .record(
                            audit::QUOTE_CONVERTED,
                            &format!("Quote {} converted to order {production_id}", order.code),
                        )
                        .await;
                    return self.require(&order.id).await;
                }
                Ok(false) => {
                    return Err(PrintShopError::Conflict(format!(
                        "Quote {} was already converted",
                        order.code
                    )));
                }
                Err(PrintShopError::Conflict(_)) => {
                    warn!(attempt, %production_id, "Production id already taken, retrying");
                }
                Err(err) => return Err(err),
            }
        }
        Err(PrintShopError::Conflict(format!(
            "Could not allocate a production id for quote {}",
            order.code
        )))
    }

    pub async fn reject_quote(&self, key: &str) -> Result<Order> {
        let order = self.require(key).await?;
        if !order.status.is_quote() {
            return Err(PrintShopError::InvalidTransition(format!(
                "Only quotes can be rejected; {} is {}",
                order.reference(),
                order.status
            )));
        }
        let order = self.set_status(order, OrderStatus::Rejected).await?;
        self.audit
            .record(audit::QUOTE_REJECTED, &format!("Quote {} rejected", order.code))
            .await;
        Ok(order)
    }

    pub async fn cancel_order(&self, key: &str) -> Result<Order> {
        let order = self.require(key).await?;
        if order.status.is_closed() {
            return Err(PrintShopError::InvalidTransition(format!(
                "Order {} is already {}",
                order.reference(),
                order.status
            )));
        }
        let order = self.set_status(order, OrderStatus::Cancelled).await?;
        self.audit
            .record(audit::ORDER_CANCELLED, &format!("Order {} cancelled", order.reference()))
            .await;
        Ok(order)
    }

    pub async fn delete_order(&self, key: &str) -> Result<()> {
        let order = self.require(key).await?;
        if order.billing_status == BillingStatus::Invoiced {
            return Err(PrintShopError::Conflict(format!(
                "Order {} has been invoiced and cannot be deleted",
                order.reference()
            )));
        }
        self.orders.delete(&order.id).await?;
        self.audit
            .record(audit::ORDER_DELETED, &format!("Order {} deleted", order.reference()))
            .await;
        Ok(())
    }

    pub async fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>> {
        let orders = self.orders.list().await?;
        Ok(orders.into_iter().filter(|order| scope.includes(order)).collect())
    }

    pub async fn get_order(&self, key: &str) -> Result<OrderDetail> {
        let order = self.require(key).await?;
        let items = self.orders.items(&order.id).await?;
        let client = match order.client_id.as_deref() {
            Some(id) => self.clients.get(id).await?,
            None => None,
        };
        Ok(OrderDetail { order, items, client })
    }

    pub async fn kpis(&self) -> Result<CrmKpis> {
        Ok(CrmKpis::from_orders(&self.orders.list().await?))
    }

    async fn require(&self, key: &str) -> Result<Order> {
        self.orders
            .find_by_reference(key)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {key} not found")))
    }

    async fn resolve_client(&self, client_id: Option<&str>) -> Result<Option<Client>> {
        match client_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self
                .clients
                .get(id)
                .await?
                .map(Some)
                .ok_or_else(|| PrintShopError::NotFound(format!("Client {id} not found"))),
            None => Ok(None),
        }
    }

    async fn set_status(&self, order: Order, status: OrderStatus) -> Result<Order> {
        let now = self.clock.now();
        self.orders.set_status(&order.id, status, now).await?;
        Ok(Order { status, updated_at: now, ..order })
    }
}

fn validate_items(items: &[ItemInput]) -> Result<()> {
    if items.is_empty() {
        return Err(PrintShopError::InvalidInput("A quote needs at least one item".to_string()));
    }
    for (idx, item) in items.iter().enumerate() {
        let line = idx + 1;
        if item.product.trim().is_empty() {
            return Err(PrintShopError::InvalidInput(format!("Item {line}: product is required")));
        }
        if item.quantity <= 0 {
            return Err(PrintShopError::InvalidInput(format!(
                "Item {line}: quantity must be positive"
            )));
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(PrintShopError::InvalidInput(format!(
                "Item {line}: unit price must not be negative"
            )));
        }
    }
    Ok(())
}

fn build_items(order_id: &str, items: &[ItemInput]) -> Vec<OrderItem> {
    items
        .iter()
        .map(|item| OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product: item.product.trim().to_string(),
            quantity: item.quantity,
            specifications: clean(item.specifications.clone()),
            unit_price: item.unit_price,
            subtotal: item.subtotal(),
        })
        .collect()
}
