//! Workflow engine - loads state, applies one event, persists and audits

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_domain::{Order, Phase, PrintShopError, Result};
use tracing::{debug, info};

use super::ports::WorkflowStore;
use super::transition::{self, Transition, WorkflowEvent};
use crate::audit::AuditService;
use crate::crm::ports::OrderRepository;
use crate::production::ports::PhaseRepository;

/// Runs workflow events against stored orders
pub struct WorkflowEngine {
    orders: Arc<dyn OrderRepository>,
    phases: Arc<dyn PhaseRepository>,
    store: Arc<dyn WorkflowStore>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl WorkflowEngine {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        phases: Arc<dyn PhaseRepository>,
        store: Arc<dyn WorkflowStore>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self { orders, phases, store, audit, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Apply `event` to the order named by `order_key` (id, production id or
    /// quote code) within `phase`.
    ///
    /// The transition is written through [`WorkflowStore::apply`] before the
    /// audit entry is recorded; audit failures do not fail the call.
    pub async fn execute(
        &self,
        order_key: &str,
        phase: Phase,
        event: WorkflowEvent,
    ) -> Result<(Order, Transition)> {
        let order = self.load_order(order_key).await?;
        let current = self.phases.get(&order.id, phase).await?;
        debug!(order_id = %order.id, phase = %phase, event = ?event, "Applying workflow event");

        let transition = transition::apply(&order, phase, current.as_ref(), event, self.clock.now())?;
        self.store.apply(&transition.write).await?;

        info!(
            order_id = %order.id,
            phase = %phase,
            from = %order.status,
            to = %transition.status_after(order.status),
            action = transition.audit.action,
            "Workflow transition applied"
        );
        self.audit.record(transition.audit.action, &transition.audit.detail).await;
        Ok((order, transition))
    }

    async fn load_order(&self, order_key: &str) -> Result<Order> {
        self.orders
            .find_by_reference(order_key)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {order_key} not found")))
    }
}
