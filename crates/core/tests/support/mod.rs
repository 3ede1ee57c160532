//! Shared test helpers for `printshop-core` integration tests.
//!
//! In-memory repositories plus a [`Harness`] that wires every service the
//! way the application does, on a fixed clock.

#![allow(dead_code)]

pub mod repositories;

use std::sync::Arc;

use printshop_common::time::{Clock, FixedClock};
use printshop_core::admin::AdminService;
use printshop_core::audit::AuditService;
use printshop_core::crm::{BillingService, ClientService, OrderService};
use printshop_core::inventory::InventoryService;
use printshop_core::production::PhaseService;
use printshop_core::session::SessionGate;
use printshop_core::workflow::WorkflowEngine;
use printshop_domain::{
    BillingConfig, ItemInput, Order, Phase, QuoteInput, Role, Session, UserProfile, UserStatus,
};

pub use repositories::{InMemoryShop, MemoryAuditLog, MemorySessionStore};

/// 2026-10-15T12:00:00Z
pub const NOW: i64 = 1_792_065_600;

pub struct Harness {
    pub shop: Arc<InMemoryShop>,
    pub audit_log: Arc<MemoryAuditLog>,
    pub sessions: Arc<MemorySessionStore>,
    pub clock: FixedClock,
    pub audit: Arc<AuditService>,
    pub gate: Arc<SessionGate>,
    pub engine: Arc<WorkflowEngine>,
    pub clients: ClientService,
    pub orders: OrderService,
    pub billing: BillingService,
    pub inventory: InventoryService,
    pub admin: AdminService,
    pub pre_press: PhaseService,
    pub press: PhaseService,
    pub post_press: PhaseService,
}

impl Harness {
    pub fn new() -> Self {
        let shop = Arc::new(InMemoryShop::default());
        let audit_log = Arc::new(MemoryAuditLog::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let clock = FixedClock::new(NOW);
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());

        let audit = Arc::new(
            AuditService::new(audit_log.clone(), sessions.clone()).with_clock(shared.clone()),
        );
        let gate = Arc::new(
            SessionGate::new(sessions.clone(), shop.clone(), audit.clone())
                .with_clock(shared.clone()),
        );
        let engine = Arc::new(
            WorkflowEngine::new(shop.clone(), shop.clone(), shop.clone(), audit.clone())
                .with_clock(shared.clone()),
        );
        let phase_service = |phase: Phase| {
            PhaseService::new(
                phase,
                shop.clone(),
                shop.clone(),
                shop.clone(),
                engine.clone(),
                gate.clone(),
                audit.clone(),
            )
            .with_clock(shared.clone())
        };

        Self {
            clients: ClientService::new(shop.clone(), audit.clone()).with_clock(shared.clone()),
            orders: OrderService::new(shop.clone(), shop.clone(), audit.clone())
                .with_clock(shared.clone()),
            billing: BillingService::new(
                shop.clone(),
                shop.clone(),
                shop.clone(),
                audit.clone(),
                BillingConfig::default(),
            )
            .with_clock(shared.clone()),
            inventory: InventoryService::new(
                shop.clone(),
                shop.clone(),
                shop.clone(),
                audit.clone(),
            )
            .with_clock(shared.clone()),
            admin: AdminService::new(
                shop.clone(),
                shop.clone(),
                shop.clone(),
                shop.clone(),
                engine.clone(),
                audit.clone(),
            )
            .with_clock(shared.clone()),
            pre_press: phase_service(Phase::PrePress),
            press: phase_service(Phase::Press),
            post_press: phase_service(Phase::PostPress),
            shop,
            audit_log,
            sessions,
            clock,
            audit,
            gate,
            engine,
        }
    }

    /// Register a staff profile and return it
    pub fn staff(&self, id: &str, role: Role) -> UserProfile {
        let profile = UserProfile {
            id: id.to_string(),
            email: format!("{id}@printshop.test"),
            full_name: format!("Staff {id}"),
            role,
            status: UserStatus::Offline,
            created_at: NOW,
            updated_at: NOW,
        };
        self.shop.insert_user(profile.clone());
        profile
    }

    /// Put a session in the store directly, bypassing sign-in
    pub fn act_as(&self, id: &str, role: Role) {
        self.sessions.put(Some(Session {
            id: id.to_string(),
            email: format!("{id}@printshop.test"),
            name: format!("Staff {id}"),
            role,
            token: "token".to_string(),
        }));
    }

    /// Create and convert a one-item quote, returning the production order
    pub async fn production_order(&self, total: f64) -> Order {
        let detail = self.orders.create_quote(quote(total)).await.unwrap();
        self.orders.convert_to_order(&detail.order.id).await.unwrap()
    }
}

/// One-item quote with the given total
pub fn quote(total: f64) -> QuoteInput {
    QuoteInput {
        client_id: None,
        notes: None,
        items: vec![ItemInput {
            product: "Business cards".to_string(),
            quantity: 1,
            specifications: Some("350g couche, 4/4".to_string()),
            unit_price: total,
        }],
    }
}
