//! Read models for the admin console

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use printshop_domain::constants::audit;
use printshop_domain::{Order, OrderStatus, Phase, PhaseRecord};
use serde::Serialize;

/// One production order on the admin board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    pub order: Order,
    pub pre_press: Option<String>,
    pub press: Option<String>,
    pub post_press: Option<String>,
    /// Phase the order is in, derived from its status
    pub current_phase: Option<Phase>,
    /// Assignee of the current phase, if any
    pub current_assignee: Option<String>,
}

/// Build a board row, naming assignees by full name when known
pub fn board_row(
    order: Order,
    records: &[PhaseRecord],
    names: &HashMap<String, String>,
) -> BoardRow {
    let assignee = |phase: Phase| {
        records
            .iter()
            .find(|record| record.phase == phase)
            .and_then(|record| record.assignee_id.as_ref())
            .map(|id| names.get(id).cloned().unwrap_or_else(|| id.clone()))
    };
    let current_phase = order.status.phase();
    BoardRow {
        pre_press: assignee(Phase::PrePress),
        press: assignee(Phase::Press),
        post_press: assignee(Phase::PostPress),
        current_assignee: current_phase.and_then(assignee),
        current_phase,
        order,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    /// Production orders that are neither quotes nor closed
    pub pending_orders: usize,
    pub completed_orders: usize,
    pub active_users: usize,
}

impl DashboardStats {
    pub fn compute(orders: &[Order], active_users: usize) -> Self {
        Self {
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| !o.status.is_quote() && !o.status.is_closed())
                .count(),
            completed_orders: orders.iter().filter(|o| o.status == OrderStatus::Completed).count(),
            active_users,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub month: String,
    pub orders: usize,
}

/// Production orders per calendar month (UTC) over the last `months`
/// months, oldest first
///
/// An order counts in the month it was converted, or created when the
/// conversion time is unknown.
pub fn production_trend(orders: &[Order], now: i64, months: u32) -> Vec<TrendPoint> {
    let Some(current) = DateTime::<Utc>::from_timestamp(now, 0)
        .and_then(|at| NaiveDate::from_ymd_opt(at.year(), at.month(), 1))
    else {
        return Vec::new();
    };

    (0..months)
        .rev()
        .filter_map(|back| {
            let start = current.checked_sub_months(Months::new(back))?;
            let end = start.checked_add_months(Months::new(1))?;
            let (from, to) = (month_epoch(start)?, month_epoch(end)?);
            let count = orders
                .iter()
                .filter(|order| order.production_id.is_some() && !order.status.is_quote())
                .map(|order| order.milestones.converted_at.unwrap_or(order.created_at))
                .filter(|at| (from..to).contains(at))
                .count();
            Some(TrendPoint { month: start.format("%Y-%m").to_string(), orders: count })
        })
        .collect()
}

fn month_epoch(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).map(|at| at.and_utc().timestamp())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSource {
    Milestone,
    Audit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    pub at: i64,
    pub label: String,
    pub source: TraceSource,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Traceability {
    pub order: Order,
    /// Chronological
    pub events: Vec<TraceEvent>,
}

/// Audit actions that belong on an order timeline
pub const TRACEABLE_ACTIONS: [&str; 7] = [
    audit::ORDER_ASSIGNED,
    audit::INVOICE_GENERATED,
    audit::TASK_CLAIMED,
    audit::TASK_CLAIMED_PRESS,
    audit::TASK_CLAIMED_POST,
    audit::PRESS_INCIDENT,
    audit::INCIDENT,
];

pub fn is_traceable(action: &str) -> bool {
    TRACEABLE_ACTIONS.contains(&action)
}

#[cfg(test)]
mod tests {
    use printshop_domain::{BillingStatus, OrderMilestones};

    use super::*;

    fn order(id: &str, status: OrderStatus, converted_at: Option<i64>) -> Order {
        Order {
            id: id.into(),
            code: format!("COT-{id}"),
            production_id: converted_at.map(|_| format!("OT-{id}")),
            status,
            client_id: None,
            total: 0.0,
            notes: None,
            billing_status: BillingStatus::Pending,
            current_assignee_id: None,
            assigned_at: None,
            milestones: OrderMilestones { converted_at, ..OrderMilestones::default() },
            created_at: converted_at.unwrap_or(0),
            updated_at: 0,
        }
    }

    fn epoch(year: i32, month: u32, day: u32) -> i64 {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .map(|d| d.and_utc().timestamp())
            .unwrap()
    }

    #[test]
    fn trend_covers_four_months_across_year_boundary() {
        let now = epoch(2026, 2, 10);
        let orders = vec![
            order("1", OrderStatus::InPress, Some(epoch(2026, 2, 1))),
            order("2", OrderStatus::Completed, Some(epoch(2025, 12, 31))),
            order("3", OrderStatus::Completed, Some(epoch(2025, 11, 2))),
            order("4", OrderStatus::Completed, Some(epoch(2025, 10, 30))),
            order("5", OrderStatus::QuoteNegotiation, None),
        ];
        let trend = production_trend(&orders, now, 4);
        let months: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
        let counts: Vec<usize> = trend.iter().map(|p| p.orders).collect();
        assert_eq!(counts, vec![1, 1, 0, 1]);
    }

    #[test]
    fn dashboard_counts_pending_production_only() {
        let orders = vec![
            order("1", OrderStatus::QuoteNegotiation, None),
            order("2", OrderStatus::Printing, Some(1)),
            order("3", OrderStatus::Completed, Some(1)),
            order("4", OrderStatus::Cancelled, Some(1)),
        ];
        let stats = DashboardStats::compute(&orders, 2);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.active_users, 2);
    }

    #[test]
    fn board_row_names_current_assignee() {
        let mut press = PhaseRecord::seed("1", Phase::Press, 0);
        press.assignee_id = Some("u-1".into());
        let mut pre = PhaseRecord::seed("1", Phase::PrePress, 0);
        pre.assignee_id = Some("u-unknown".into());
        let names = HashMap::from([("u-1".to_string(), "Rosa Quispe".to_string())]);

        let row = board_row(order("1", OrderStatus::PressPrep, Some(1)), &[pre, press], &names);
        assert_eq!(row.current_phase, Some(Phase::Press));
        assert_eq!(row.current_assignee.as_deref(), Some("Rosa Quispe"));
        assert_eq!(row.pre_press.as_deref(), Some("u-unknown"));
        assert_eq!(row.post_press, None);
    }

    #[test]
    fn traceable_actions() {
        assert!(is_traceable(audit::TASK_CLAIMED_PRESS));
        assert!(is_traceable(audit::PRESS_INCIDENT));
        assert!(is_traceable(audit::INVOICE_GENERATED));
        assert!(is_traceable(audit::TASK_CLAIMED));
        assert!(is_traceable(audit::TASK_CLAIMED_POST));
        assert!(!is_traceable(audit::STEP_UPDATED));
    }

    #[test]
    fn lookalike_tags_stay_off_the_timeline() {
        assert!(!is_traceable("TAREA_TOMADA_ARCHIVO"));
        assert!(!is_traceable("incidencia_prensa"));
        assert!(!is_traceable("REPORTE_INCIDENCIAS"));
    }
}
