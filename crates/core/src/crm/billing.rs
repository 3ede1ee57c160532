//! Invoice and receipt issuing

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_domain::constants::audit;
use printshop_domain::{
    round_money, BillingConfig, BillingStatus, DocumentType, Invoice, InvoiceKind, OrderStatus,
    PrintShopError, Result,
};
use tracing::info;
use uuid::Uuid;

use super::ports::{ClientRepository, InvoiceRepository, OrderRepository};
use crate::audit::AuditService;
use crate::utils::codes;

pub struct BillingService {
    orders: Arc<dyn OrderRepository>,
    clients: Arc<dyn ClientRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    audit: Arc<AuditService>,
    config: BillingConfig,
    clock: Arc<dyn Clock>,
}

impl BillingService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        clients: Arc<dyn ClientRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        audit: Arc<AuditService>,
        config: BillingConfig,
    ) -> Self {
        Self { orders, clients, invoices, audit, config, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue the single tax document of an order
    ///
    /// The total is tax-inclusive; the subtotal is derived from the
    /// configured rate and the tax is the remainder.
    pub async fn generate_invoice(&self, order_key: &str, kind: InvoiceKind) -> Result<Invoice> {
        let order = self
            .orders
            .find_by_reference(order_key)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {order_key} not found")))?;
        if order.status.is_quote()
            || matches!(order.status, OrderStatus::Rejected | OrderStatus::Cancelled)
        {
            return Err(PrintShopError::InvalidTransition(format!(
                "Order {} is {} and cannot be invoiced",
                order.reference(),
                order.status
            )));
        }
        if self.invoices.find_by_order(&order.id).await?.is_some() {
            return Err(PrintShopError::Conflict("This order has already been invoiced.".into()));
        }

        let client_id = order.client_id.as_deref().ok_or_else(|| {
            PrintShopError::InvalidInput(format!("Order {} has no client", order.reference()))
        })?;
        let client = self
            .clients
            .get(client_id)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Client {client_id} not found")))?;
        if kind == InvoiceKind::Invoice && client.document_type() != Some(DocumentType::Ruc) {
            return Err(PrintShopError::InvalidInput(
                "An invoice requires a client with an 11-digit tax id".to_string(),
            ));
        }

        let series = match kind {
            InvoiceKind::Invoice => &self.config.invoice_series,
            InvoiceKind::Receipt => &self.config.receipt_series,
        };
        let sequence = self.invoices.count_by_kind(kind).await? + 1;
        let subtotal = round_money(order.total / (1.0 + self.config.tax_rate));

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            kind,
            number: codes::invoice_number(series, sequence),
            client_name: client.business_name.clone(),
            client_document: client.document_number.clone(),
            client_address: client.billing_address(),
            subtotal,
            tax: round_money(order.total - subtotal),
            total: order.total,
            issued_at: self.clock.now(),
        };
        self.invoices.create(invoice.clone()).await?;
        self.orders
            .set_billing_status(&order.id, BillingStatus::Invoiced, invoice.issued_at)
            .await?;

        info!(
            order_id = %order.id,
            number = %invoice.number,
            total = invoice.total,
            "Invoice issued"
        );
        self.audit
            .record(
                audit::INVOICE_GENERATED,
                &format!("{} issued for order {}", invoice.number, order.reference()),
            )
            .await;
        Ok(invoice)
    }

    /// Newest first
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.invoices.list().await
    }
}
