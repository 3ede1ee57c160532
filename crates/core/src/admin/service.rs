//! Admin service - staff, providers and production oversight

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_common::validation::Validator;
use printshop_common::{EmailValidator, StringValidator};
use printshop_domain::constants::{audit, PRODUCTION_TREND_MONTHS};
use printshop_domain::{
    Order, Phase, PhaseRecord, PrintShopError, Provider, ProviderInput, Result, UserInput,
    UserProfile, UserStatus,
};
use tracing::info;
use uuid::Uuid;

use super::stats::{
    self, BoardRow, DashboardStats, TraceEvent, TraceSource, Traceability, TrendPoint,
};
use crate::audit::AuditService;
use crate::crm::ports::OrderRepository;
use crate::inventory::ports::ProviderRepository;
use crate::production::ports::PhaseRepository;
use crate::user::ports::UserProfileRepository;
use crate::utils::{clean, invalid_input};
use crate::workflow::{WorkflowEngine, WorkflowEvent};

pub struct AdminService {
    users: Arc<dyn UserProfileRepository>,
    providers: Arc<dyn ProviderRepository>,
    orders: Arc<dyn OrderRepository>,
    phases: Arc<dyn PhaseRepository>,
    engine: Arc<WorkflowEngine>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserProfileRepository>,
        providers: Arc<dyn ProviderRepository>,
        orders: Arc<dyn OrderRepository>,
        phases: Arc<dyn PhaseRepository>,
        engine: Arc<WorkflowEngine>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self { users, providers, orders, phases, engine, audit, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
        self.users.list().await
    }

    /// Register a staff profile; credentials live with the identity provider
    pub async fn create_user(&self, input: UserInput) -> Result<UserProfile> {
        let input = validate_user(input)?;
        if self.users.get_by_email(&input.email).await?.is_some() {
            return Err(PrintShopError::Conflict(format!(
                "A user with email {} already exists",
                input.email
            )));
        }

        let now = self.clock.now();
        let profile = UserProfile {
            id: Uuid::new_v4().to_string(),
            email: input.email,
            full_name: input.full_name,
            role: input.role,
            status: UserStatus::Offline,
            created_at: now,
            updated_at: now,
        };
        self.users.create(profile.clone()).await?;
        self.audit
            .record(
                audit::USER_CREATED,
                &format!("User {} created as {}", profile.email, profile.role.display_name()),
            )
            .await;
        Ok(profile)
    }

    pub async fn update_user(&self, id: &str, input: UserInput) -> Result<UserProfile> {
        let existing = self.require_user(id).await?;
        let input = validate_user(input)?;
        if let Some(other) = self.users.get_by_email(&input.email).await? {
            if other.id != existing.id {
                return Err(PrintShopError::Conflict(format!(
                    "A user with email {} already exists",
                    input.email
                )));
            }
        }

        let profile = UserProfile {
            email: input.email,
            full_name: input.full_name,
            role: input.role,
            updated_at: self.clock.now(),
            ..existing
        };
        self.users.update(profile.clone()).await?;
        self.audit.record(audit::USER_UPDATED, &format!("User {} updated", profile.email)).await;
        Ok(profile)
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let profile = self.require_user(id).await?;
        self.users.delete(id).await?;
        self.audit.record(audit::USER_DELETED, &format!("User {} deleted", profile.email)).await;
        Ok(())
    }

    /// Users currently signed in
    pub async fn active_users(&self) -> Result<usize> {
        let users = self.users.list().await?;
        Ok(users.iter().filter(|user| user.status == UserStatus::Online).count())
    }

    // ========================================================================
    // Providers
    // ========================================================================

    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.providers.list().await
    }

    pub async fn create_provider(&self, input: ProviderInput) -> Result<Provider> {
        let input = validate_provider(input)?;
        let now = self.clock.now();
        let provider = Provider {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            tax_id: input.tax_id,
            contact: input.contact,
            supplies: input.supplies,
            address: input.address,
            created_at: now,
            updated_at: now,
        };
        self.providers.create(provider.clone()).await?;
        self.audit
            .record(audit::PROVIDER_CREATED, &format!("Provider {} created", provider.name))
            .await;
        Ok(provider)
    }

    pub async fn update_provider(&self, id: &str, input: ProviderInput) -> Result<Provider> {
        let existing = self
            .providers
            .get(id)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Provider {id} not found")))?;
        let input = validate_provider(input)?;
        let provider = Provider {
            name: input.name,
            tax_id: input.tax_id,
            contact: input.contact,
            supplies: input.supplies,
            address: input.address,
            updated_at: self.clock.now(),
            ..existing
        };
        self.providers.update(provider.clone()).await?;
        self.audit
            .record(audit::PROVIDER_UPDATED, &format!("Provider {} updated", provider.name))
            .await;
        Ok(provider)
    }

    pub async fn delete_provider(&self, id: &str) -> Result<()> {
        let provider = self
            .providers
            .get(id)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Provider {id} not found")))?;
        self.providers.delete(id).await?;
        self.audit
            .record(audit::PROVIDER_DELETED, &format!("Provider {} deleted", provider.name))
            .await;
        Ok(())
    }

    // ========================================================================
    // Production oversight
    // ========================================================================

    /// Every production order with its per-phase assignees
    pub async fn production_board(&self) -> Result<Vec<BoardRow>> {
        let names: HashMap<String, String> = self
            .users
            .list()
            .await?
            .into_iter()
            .map(|user| (user.id, user.full_name))
            .collect();

        let mut rows = Vec::new();
        for order in self.orders.list().await? {
            if order.status.is_quote() {
                continue;
            }
            let records = self.phases.list_for_order(&order.id).await?;
            rows.push(stats::board_row(order, &records, &names));
        }
        Ok(rows)
    }

    /// Assign (or with `None`, unassign) an order's current phase
    pub async fn assign(
        &self,
        order_key: &str,
        phase: Phase,
        user_id: Option<&str>,
    ) -> Result<PhaseRecord> {
        if let Some(user_id) = user_id {
            self.require_user(user_id).await?;
        }
        let event = WorkflowEvent::Assign { assignee_id: user_id.map(str::to_string) };
        let (order, transition) = self.engine.execute(order_key, phase, event).await?;
        info!(order_id = %order.id, phase = %phase, assignee = ?user_id, "Order assignment changed");
        Ok(transition.write.record)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let orders = self.orders.list().await?;
        let active_users = self.active_users().await?;
        Ok(DashboardStats::compute(&orders, active_users))
    }

    /// Production orders per month, oldest of the last four months first
    pub async fn production_trend(&self) -> Result<Vec<TrendPoint>> {
        let orders = self.orders.list().await?;
        Ok(stats::production_trend(&orders, self.clock.now(), PRODUCTION_TREND_MONTHS))
    }

    /// Timeline of an order from its milestones and related audit entries
    pub async fn trace(&self, key: &str) -> Result<Traceability> {
        let order = self
            .orders
            .find_by_reference(key.trim())
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("Order {key} not found")))?;

        let mut events: Vec<TraceEvent> = vec![TraceEvent {
            at: order.created_at,
            label: format!("Quote {} created", order.code),
            source: TraceSource::Milestone,
            actor: None,
        }];
        events.extend(order.milestones.recorded().into_iter().map(|(milestone, at)| TraceEvent {
            at,
            label: milestone.title().to_string(),
            source: TraceSource::Milestone,
            actor: None,
        }));

        let mut seen = HashSet::new();
        for needle in references(&order) {
            for entry in self.audit.search(&needle).await? {
                if stats::is_traceable(&entry.action) && seen.insert(entry.id.clone()) {
                    events.push(TraceEvent {
                        at: entry.created_at,
                        label: format!("{}: {}", entry.action, entry.details),
                        source: TraceSource::Audit,
                        actor: Some(entry.user_email),
                    });
                }
            }
        }
        events.sort_by_key(|event| event.at);
        Ok(Traceability { order, events })
    }

    async fn require_user(&self, id: &str) -> Result<UserProfile> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| PrintShopError::NotFound(format!("User {id} not found")))
    }
}

fn references(order: &Order) -> Vec<String> {
    let mut refs = vec![order.code.clone()];
    if let Some(production_id) = order.production_id.as_ref().filter(|id| !id.is_empty()) {
        refs.push(production_id.clone());
    }
    refs
}

fn validate_user(input: UserInput) -> Result<UserInput> {
    let input = UserInput {
        email: input.email.trim().to_lowercase(),
        full_name: input.full_name.trim().to_string(),
        ..input
    };
    Validator::new()
        .check("email", &input.email, &EmailValidator::new())
        .check("full_name", &input.full_name, &StringValidator::new().not_empty().max_length(120))
        .finish()
        .map_err(invalid_input)?;
    Ok(input)
}

fn validate_provider(input: ProviderInput) -> Result<ProviderInput> {
    let input = ProviderInput {
        name: input.name.trim().to_string(),
        tax_id: clean(input.tax_id),
        contact: clean(input.contact),
        supplies: clean(input.supplies),
        address: clean(input.address),
    };
    Validator::new()
        .check("name", &input.name, &StringValidator::new().not_empty().max_length(200))
        .finish()
        .map_err(invalid_input)?;
    Ok(input)
}
