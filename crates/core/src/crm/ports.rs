//! Port interfaces for CRM persistence

use async_trait::async_trait;
use printshop_domain::{
    BillingStatus, Client, Invoice, InvoiceKind, Order, OrderItem, OrderStatus, Result,
};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// All clients ordered by business name
    async fn list(&self) -> Result<Vec<Client>>;

    /// Case-insensitive match on business name or document number
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Client>>;

    async fn get(&self, id: &str) -> Result<Option<Client>>;

    async fn find_by_document(&self, document_number: &str) -> Result<Option<Client>>;

    /// Insert a client; a duplicate document number is a `Conflict`
    async fn create(&self, client: Client) -> Result<()>;

    async fn update(&self, client: Client) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order header and its items together
    async fn create(&self, order: Order, items: Vec<OrderItem>) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Order>>;

    /// Lookup by internal id, production id or quote code
    async fn find_by_reference(&self, key: &str) -> Result<Option<Order>>;

    /// Newest first
    async fn list(&self) -> Result<Vec<Order>>;

    /// Rewrite client, notes and total and replace every item together
    async fn update(&self, order: &Order, items: Vec<OrderItem>) -> Result<()>;

    async fn items(&self, order_id: &str) -> Result<Vec<OrderItem>>;

    async fn set_status(&self, id: &str, status: OrderStatus, now: i64) -> Result<()>;

    /// Assign `production_id`, move to order-created and stamp the
    /// conversion time, only if no production id is set yet.
    ///
    /// Returns `false` when the order was already converted. A production id
    /// used by another order is a `Conflict`.
    async fn convert(&self, id: &str, production_id: &str, now: i64) -> Result<bool>;

    async fn set_billing_status(&self, id: &str, status: BillingStatus, now: i64) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert an invoice; a second invoice for the same order is a `Conflict`
    async fn create(&self, invoice: Invoice) -> Result<()>;

    async fn find_by_order(&self, order_id: &str) -> Result<Option<Invoice>>;

    async fn count_by_kind(&self, kind: InvoiceKind) -> Result<u64>;

    /// Newest first
    async fn list(&self) -> Result<Vec<Invoice>>;
}
