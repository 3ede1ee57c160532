//! Phase service - queue, claim and checklist operations for one phase

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_domain::constants::audit;
use printshop_domain::{
    Incident, Order, OrderItem, Phase, PhaseMetrics, PhaseRecord, PhaseTask, PrintShopError,
    Result,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{IncidentRepository, PhaseRepository};
use super::queue;
use crate::audit::AuditService;
use crate::crm::ports::OrderRepository;
use crate::session::SessionGate;
use crate::workflow::{ApprovalDecision, Transition, WorkflowEngine, WorkflowEvent};

/// Order header, first line item and the phase record, as shown on a task
/// card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetail {
    pub order: Order,
    pub first_item: Option<OrderItem>,
    pub record: PhaseRecord,
}

/// Operations of one production phase
///
/// One instance per [`Phase`]; every mutation goes through the shared
/// [`WorkflowEngine`].
pub struct PhaseService {
    phase: Phase,
    phases: Arc<dyn PhaseRepository>,
    orders: Arc<dyn OrderRepository>,
    incidents: Arc<dyn IncidentRepository>,
    engine: Arc<WorkflowEngine>,
    session: Arc<SessionGate>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl PhaseService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        phase: Phase,
        phases: Arc<dyn PhaseRepository>,
        orders: Arc<dyn OrderRepository>,
        incidents: Arc<dyn IncidentRepository>,
        engine: Arc<WorkflowEngine>,
        session: Arc<SessionGate>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            phase,
            phases,
            orders,
            incidents,
            engine,
            session,
            audit,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Orders waiting to be claimed in this phase
    pub async fn list_incoming(&self) -> Result<Vec<Order>> {
        let candidates = self.phases.list_incoming(self.phase).await?;
        Ok(queue::filter_free(self.phase, candidates))
    }

    /// Claim an order for the signed-in operator
    ///
    /// Returns `Ok(false)` without writing anything when nobody is signed in.
    /// Two operators claiming the same order both succeed; the later write
    /// holds the order.
    pub async fn claim(&self, order_key: &str) -> Result<bool> {
        let Some(actor) = self.session.current_actor().await? else {
            warn!(phase = %self.phase, order = order_key, "Claim ignored: no signed-in actor");
            return Ok(false);
        };
        self.engine
            .execute(order_key, self.phase, WorkflowEvent::Claim { actor_id: actor.id.clone() })
            .await?;
        info!(phase = %self.phase, order = order_key, actor = %actor.email, "Order claimed");
        Ok(true)
    }

    /// Open tasks of the signed-in operator; empty without a session
    pub async fn list_mine(&self) -> Result<Vec<PhaseTask>> {
        match self.session.current_actor().await? {
            Some(actor) => self.phases.list_assigned(self.phase, &actor.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Tick or untick one checklist step
    pub async fn advance(&self, order_key: &str, step: usize, done: bool) -> Result<PhaseRecord> {
        let (_, transition) =
            self.engine.execute(order_key, self.phase, WorkflowEvent::Step { step, done }).await?;
        Ok(transition.write.record)
    }

    /// Close the phase and hand the order to the next queue
    pub async fn finish(&self, order_key: &str, metrics: PhaseMetrics) -> Result<Transition> {
        let (_, transition) =
            self.engine.execute(order_key, self.phase, WorkflowEvent::Finish(metrics)).await?;
        Ok(transition)
    }

    /// Task card for one order; the record defaults to a fresh seed when the
    /// phase has not been reached yet
    pub async fn task(&self, order_key: &str) -> Result<TaskDetail> {
        let order = self
            .orders
            .find_by_reference(order_key)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {order_key} not found")))?;
        let record = match self.phases.get(&order.id, self.phase).await? {
            Some(record) => record,
            None => PhaseRecord::seed(&order.id, self.phase, self.clock.now()),
        };
        let first_item = self.orders.items(&order.id).await?.into_iter().next();
        Ok(TaskDetail { order, first_item, record })
    }

    /// Record the client's answer to the design proof
    pub async fn set_approval(
        &self,
        order_key: &str,
        decision: ApprovalDecision,
    ) -> Result<PhaseRecord> {
        if self.phase != Phase::PrePress {
            return Err(PrintShopError::InvalidInput(format!(
                "Client approval only applies to pre-press, not {}",
                self.phase.title()
            )));
        }
        let (_, transition) =
            self.engine.execute(order_key, self.phase, WorkflowEvent::Approval(decision)).await?;
        Ok(transition.write.record)
    }

    /// Log a production incident against an order in this phase
    pub async fn report_incident(
        &self,
        order_key: &str,
        kind: &str,
        detail: &str,
    ) -> Result<Incident> {
        if kind.trim().is_empty() {
            return Err(PrintShopError::InvalidInput("Incident type is required".to_string()));
        }
        let order = self
            .orders
            .find_by_reference(order_key)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {order_key} not found")))?;
        let actor = self.session.current_actor().await?;

        let incident = Incident {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            phase: self.phase,
            kind: kind.trim().to_string(),
            detail: detail.trim().to_string(),
            reported_by: actor.map(|actor| actor.id),
            reported_at: self.clock.now(),
        };
        self.incidents.create(incident.clone()).await?;

        let action = match self.phase {
            Phase::Press => audit::PRESS_INCIDENT,
            _ => audit::INCIDENT,
        };
        self.audit
            .record(
                action,
                &format!("Order {}: {} - {}", order.reference(), incident.kind, incident.detail),
            )
            .await;
        Ok(incident)
    }

    /// Incidents logged for an order, any phase
    pub async fn incidents(&self, order_key: &str) -> Result<Vec<Incident>> {
        let order = self
            .orders
            .find_by_reference(order_key)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {order_key} not found")))?;
        self.incidents.list_for_order(&order.id).await
    }
}
