//! Products, providers and purchase orders

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// ABC rotation class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    #[default]
    C,
}

impl_domain_status_conversions!(AbcClass {
    A => "a",
    B => "b",
    C => "c",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub abc_class: AbcClass,
    pub stock: i64,
    pub min_stock: i64,
    pub unit_price: f64,
    pub provider_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn is_critical(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Above the minimum but within the near-depletion band
    pub fn is_near_depletion(&self, factor: f64) -> bool {
        !self.is_critical() && (self.stock as f64) <= self.min_stock as f64 * factor
    }

    /// Units missing to get back to the minimum
    pub fn deficit(&self) -> i64 {
        (self.min_stock - self.stock).max(0)
    }
}

/// Fields accepted when creating or editing a product
///
/// A blank or `[Auto]` SKU is generated from the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub sku: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub abc_class: AbcClass,
    pub stock: i64,
    pub min_stock: i64,
    pub unit_price: f64,
    pub provider_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub contact: Option<String>,
    /// Free-text description of what the provider supplies
    pub supplies: Option<String>,
    pub address: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInput {
    pub name: String,
    pub tax_id: Option<String>,
    pub contact: Option<String>,
    pub supplies: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    #[default]
    Sent,
    Received,
    Cancelled,
}

impl_domain_status_conversions!(PurchaseOrderStatus {
    Sent => "sent",
    Received => "received",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    pub product_name: String,
    pub quantity: i64,
    pub agreed_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    /// `OC-{year}-NNNN`
    pub code: String,
    pub provider_id: String,
    pub status: PurchaseOrderStatus,
    pub total: f64,
    pub issued_at: i64,
    pub received_at: Option<i64>,
    pub comments: Option<String>,
    pub items: Vec<PurchaseOrderItem>,
}

impl PurchaseOrder {
    /// Days between issue and reception
    pub fn cycle_days(&self) -> Option<f64> {
        self.received_at.map(|received| (received - self.issued_at) as f64 / 86_400.0)
    }
}
