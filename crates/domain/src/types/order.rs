//! Orders (quotes and production orders) and their line items

use serde::{Deserialize, Serialize};

use super::status::OrderStatus;
use crate::impl_domain_status_conversions;

/// A customer order
///
/// Starts life as a quote identified by `code`; conversion assigns the
/// production id exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Quote code (`COT-XXXXXX`)
    pub code: String,
    /// Production id (`OT-NNNN`), set on conversion and never reassigned
    pub production_id: Option<String>,
    pub status: OrderStatus,
    pub client_id: Option<String>,
    pub total: f64,
    pub notes: Option<String>,
    pub billing_status: BillingStatus,
    /// Operator currently holding the order in its phase
    pub current_assignee_id: Option<String>,
    pub assigned_at: Option<i64>,
    pub milestones: OrderMilestones,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Reference shown to people: the production id once converted,
    /// otherwise the quote code.
    pub fn reference(&self) -> &str {
        self.production_id.as_deref().filter(|id| !id.is_empty()).unwrap_or(&self.code)
    }

    /// Whether `key` names this order by id, production id or quote code
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.code == key || self.production_id.as_deref() == Some(key)
    }
}

/// Per-phase milestone timestamps (epoch seconds), each set at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMilestones {
    pub converted_at: Option<i64>,
    pub design_started_at: Option<i64>,
    pub approval_sent_at: Option<i64>,
    pub press_queued_at: Option<i64>,
    pub prep_started_at: Option<i64>,
    pub printing_started_at: Option<i64>,
    pub press_finished_at: Option<i64>,
    pub finishing_started_at: Option<i64>,
    pub quality_started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

/// Named milestone, used by workflow writes and the traceability timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Converted,
    DesignStarted,
    ApprovalSent,
    PressQueued,
    PrepStarted,
    PrintingStarted,
    PressFinished,
    FinishingStarted,
    QualityStarted,
    Completed,
}

impl_domain_status_conversions!(Milestone {
    Converted => "converted_at",
    DesignStarted => "design_started_at",
    ApprovalSent => "approval_sent_at",
    PressQueued => "press_queued_at",
    PrepStarted => "prep_started_at",
    PrintingStarted => "printing_started_at",
    PressFinished => "press_finished_at",
    FinishingStarted => "finishing_started_at",
    QualityStarted => "quality_started_at",
    Completed => "completed_at",
});

impl Milestone {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Converted => "Production order created",
            Self::DesignStarted => "Design started",
            Self::ApprovalSent => "Proof sent for client approval",
            Self::PressQueued => "Passed to press",
            Self::PrepStarted => "Press preparation started",
            Self::PrintingStarted => "Printing started",
            Self::PressFinished => "Printing finished",
            Self::FinishingStarted => "Finishing started",
            Self::QualityStarted => "Quality control started",
            Self::Completed => "Order completed",
        }
    }
}

impl OrderMilestones {
    pub fn get(&self, milestone: Milestone) -> Option<i64> {
        match milestone {
            Milestone::Converted => self.converted_at,
            Milestone::DesignStarted => self.design_started_at,
            Milestone::ApprovalSent => self.approval_sent_at,
            Milestone::PressQueued => self.press_queued_at,
            Milestone::PrepStarted => self.prep_started_at,
            Milestone::PrintingStarted => self.printing_started_at,
            Milestone::PressFinished => self.press_finished_at,
            Milestone::FinishingStarted => self.finishing_started_at,
            Milestone::QualityStarted => self.quality_started_at,
            Milestone::Completed => self.completed_at,
        }
    }

    fn slot(&mut self, milestone: Milestone) -> &mut Option<i64> {
        match milestone {
            Milestone::Converted => &mut self.converted_at,
            Milestone::DesignStarted => &mut self.design_started_at,
            Milestone::ApprovalSent => &mut self.approval_sent_at,
            Milestone::PressQueued => &mut self.press_queued_at,
            Milestone::PrepStarted => &mut self.prep_started_at,
            Milestone::PrintingStarted => &mut self.printing_started_at,
            Milestone::PressFinished => &mut self.press_finished_at,
            Milestone::FinishingStarted => &mut self.finishing_started_at,
            Milestone::QualityStarted => &mut self.quality_started_at,
            Milestone::Completed => &mut self.completed_at,
        }
    }

    /// Record `at` unless the milestone is already set; returns whether it
    /// was written
    pub fn stamp(&mut self, milestone: Milestone, at: i64) -> bool {
        let slot = self.slot(milestone);
        if slot.is_some() {
            return false;
        }
        *slot = Some(at);
        true
    }

    /// Set milestones in chronological order of the workflow
    pub fn recorded(&self) -> Vec<(Milestone, i64)> {
        Milestone::ALL.iter().filter_map(|m| self.get(*m).map(|at| (*m, at))).collect()
    }
}

/// Whether a tax document has been issued for the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Pending,
    Invoiced,
}

impl_domain_status_conversions!(BillingStatus {
    Pending => "pending",
    Invoiced => "invoiced",
});

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product: String,
    pub quantity: i64,
    pub specifications: Option<String>,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Line item as entered on a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
    pub product: String,
    pub quantity: i64,
    pub specifications: Option<String>,
    pub unit_price: f64,
}

impl ItemInput {
    pub fn subtotal(&self) -> f64 {
        round_money(self.quantity as f64 * self.unit_price)
    }
}

/// Header and items for creating or updating a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub client_id: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<ItemInput>,
}

impl QuoteInput {
    pub fn total(&self) -> f64 {
        round_money(self.items.iter().map(ItemInput::subtotal).sum())
    }
}

/// Round a currency amount to cents
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: "o-1".into(),
            code: "COT-ABC123".into(),
            production_id: None,
            status: OrderStatus::QuoteNegotiation,
            client_id: None,
            total: 0.0,
            notes: None,
            billing_status: BillingStatus::Pending,
            current_assignee_id: None,
            assigned_at: None,
            milestones: OrderMilestones::default(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn reference_prefers_production_id() {
        let mut order = order();
        assert_eq!(order.reference(), "COT-ABC123");
        order.production_id = Some(String::new());
        assert_eq!(order.reference(), "COT-ABC123");
        order.production_id = Some("OT-4821".into());
        assert_eq!(order.reference(), "OT-4821");
        assert!(order.matches_key("OT-4821"));
        assert!(order.matches_key("COT-ABC123"));
        assert!(order.matches_key("o-1"));
    }

    #[test]
    fn milestones_are_set_once() {
        let mut milestones = OrderMilestones::default();
        assert!(milestones.stamp(Milestone::DesignStarted, 100));
        assert!(!milestones.stamp(Milestone::DesignStarted, 200));
        assert_eq!(milestones.design_started_at, Some(100));
    }

    #[test]
    fn recorded_milestones_follow_workflow_order() {
        let mut milestones = OrderMilestones::default();
        milestones.stamp(Milestone::PrintingStarted, 50);
        milestones.stamp(Milestone::Converted, 90);
        let recorded: Vec<Milestone> = milestones.recorded().into_iter().map(|(m, _)| m).collect();
        assert_eq!(recorded, vec![Milestone::Converted, Milestone::PrintingStarted]);
    }

    #[test]
    fn quote_total_sums_line_subtotals() {
        let quote = QuoteInput {
            client_id: None,
            notes: None,
            items: vec![
                ItemInput {
                    product: "Flyers A5".into(),
                    quantity: 1000,
                    specifications: None,
                    unit_price: 0.12,
                },
                ItemInput {
                    product: "Banner".into(),
                    quantity: 2,
                    specifications: Some("1x2m".into()),
                    unit_price: 45.5,
                },
            ],
        };
        assert!((quote.total() - 211.0).abs() < f64::EPSILON);
    }
}
