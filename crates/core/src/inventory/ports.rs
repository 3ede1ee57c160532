//! Port interfaces for inventory persistence

use async_trait::async_trait;
use printshop_domain::{Product, Provider, PurchaseOrder, Result};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Ordered by name
    async fn list(&self) -> Result<Vec<Product>>;

    async fn get(&self, id: &str) -> Result<Option<Product>>;

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Product>>;

    /// Insert a product; a duplicate SKU is a `Conflict`
    async fn create(&self, product: Product) -> Result<()>;

    async fn update(&self, product: Product) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Ordered by name
    async fn list(&self) -> Result<Vec<Provider>>;

    /// Case-insensitive match on name, tax id or supplies
    async fn search(&self, query: &str) -> Result<Vec<Provider>>;

    async fn get(&self, id: &str) -> Result<Option<Provider>>;

    async fn create(&self, provider: Provider) -> Result<()>;

    async fn update(&self, provider: Provider) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait PurchaseOrderRepository: Send + Sync {
    /// Newest first, items included
    async fn list(&self) -> Result<Vec<PurchaseOrder>>;

    /// Lookup by id or `OC-` code
    async fn find(&self, key: &str) -> Result<Option<PurchaseOrder>>;

    /// Insert header and items together
    async fn create(&self, order: PurchaseOrder) -> Result<()>;

    /// Mark a sent purchase order received and add every item quantity to
    /// the stock of the product with the same name (case-insensitive), in one
    /// unit of work.
    ///
    /// Returns `false` when the order was no longer in the sent state.
    async fn receive(&self, id: &str, comments: Option<String>, now: i64) -> Result<bool>;
}
