//! Tax documents issued for orders

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Factura, issued to companies (RUC)
    Invoice,
    /// Boleta, issued to people (DNI)
    Receipt,
}

impl_domain_status_conversions!(InvoiceKind {
    Invoice => "invoice",
    Receipt => "receipt",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub order_id: String,
    pub kind: InvoiceKind,
    /// `SERIES-NNNNNN`
    pub number: String,
    pub client_name: String,
    pub client_document: String,
    pub client_address: String,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub issued_at: i64,
}
