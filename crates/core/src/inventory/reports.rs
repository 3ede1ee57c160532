//! Inventory indicators computed from product and purchase snapshots

use chrono::{DateTime, Datelike, Utc};
use printshop_domain::constants::NEAR_DEPLETION_FACTOR;
use printshop_domain::{AbcClass, Product, PurchaseOrder, PurchaseOrderStatus};
use serde::Serialize;

/// Stock dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventoryKpis {
    /// Stock at or below the minimum
    pub critical: usize,
    /// Above the minimum but within 1.5x of it
    pub near_depletion: usize,
    pub pending_purchase_orders: usize,
    pub total_items: usize,
}

impl InventoryKpis {
    pub fn compute(products: &[Product], purchases: &[PurchaseOrder]) -> Self {
        Self {
            critical: products.iter().filter(|p| p.is_critical()).count(),
            near_depletion: products
                .iter()
                .filter(|p| p.is_near_depletion(NEAR_DEPLETION_FACTOR))
                .count(),
            pending_purchase_orders: purchases
                .iter()
                .filter(|po| po.status == PurchaseOrderStatus::Sent)
                .count(),
            total_items: products.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplenishmentLine {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub stock: i64,
    pub min_stock: i64,
    pub deficit: i64,
}

/// Share of products per ABC class, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AbcDistribution {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    /// Class C items still holding stock
    pub idle_items: Vec<Product>,
    /// Critical items, largest deficit first
    pub replenishment: Vec<ReplenishmentLine>,
    pub abc: AbcDistribution,
    /// Percent of items neither critical nor near depletion
    pub health_pct: f64,
    /// Purchase orders issued in the current calendar month (UTC)
    pub purchases_this_month: usize,
    /// Mean days from issue to reception over received orders
    pub average_cycle_days: Option<f64>,
}

impl InventoryReport {
    pub fn compute(products: &[Product], purchases: &[PurchaseOrder], now: i64) -> Self {
        let idle_items = products
            .iter()
            .filter(|p| p.abc_class == AbcClass::C && p.stock > 0)
            .cloned()
            .collect();

        let mut replenishment: Vec<ReplenishmentLine> = products
            .iter()
            .filter(|p| p.is_critical())
            .map(|p| ReplenishmentLine {
                product_id: p.id.clone(),
                sku: p.sku.clone(),
                name: p.name.clone(),
                stock: p.stock,
                min_stock: p.min_stock,
                deficit: p.deficit(),
            })
            .collect();
        replenishment.sort_by(|a, b| b.deficit.cmp(&a.deficit).then_with(|| a.name.cmp(&b.name)));

        let healthy = products
            .iter()
            .filter(|p| !p.is_critical() && !p.is_near_depletion(NEAR_DEPLETION_FACTOR))
            .count();

        let cycles: Vec<f64> = purchases
            .iter()
            .filter(|po| po.status == PurchaseOrderStatus::Received)
            .filter_map(PurchaseOrder::cycle_days)
            .collect();
        let average_cycle_days = (!cycles.is_empty())
            .then(|| round1(cycles.iter().sum::<f64>() / cycles.len() as f64));

        Self {
            idle_items,
            replenishment,
            abc: abc_distribution(products),
            health_pct: percent(healthy, products.len()).unwrap_or(100.0),
            purchases_this_month: purchases
                .iter()
                .filter(|po| same_month(po.issued_at, now))
                .count(),
            average_cycle_days,
        }
    }
}

fn abc_distribution(products: &[Product]) -> AbcDistribution {
    let count = |class: AbcClass| products.iter().filter(|p| p.abc_class == class).count();
    let total = products.len();
    AbcDistribution {
        a: percent(count(AbcClass::A), total).unwrap_or_default(),
        b: percent(count(AbcClass::B), total).unwrap_or_default(),
        c: percent(count(AbcClass::C), total).unwrap_or_default(),
    }
}

fn percent(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| round1(part as f64 * 100.0 / total as f64))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn same_month(a: i64, b: i64) -> bool {
    match (DateTime::<Utc>::from_timestamp(a, 0), DateTime::<Utc>::from_timestamp(b, 0)) {
        (Some(a), Some(b)) => a.year() == b.year() && a.month() == b.month(),
        _ => false,
    }
}
