//! Shared harness for `printshop-infra` integration tests.
//!
//! Wires the core services over a throwaway SQLite database and a file
//! session mirror, on a fixed clock.

#![allow(dead_code)]

use std::sync::Arc;

use printshop_common::time::{Clock, FixedClock};
use printshop_core::admin::AdminService;
use printshop_core::audit::AuditService;
use printshop_core::crm::{BillingService, ClientService, OrderService};
use printshop_core::inventory::InventoryService;
use printshop_core::production::PhaseService;
use printshop_core::session::SessionGate;
use printshop_core::user::UserProfileRepository;
use printshop_core::workflow::WorkflowEngine;
use printshop_domain::{
    BillingConfig, ItemInput, Order, Phase, QuoteInput, Role, UserProfile, UserStatus,
};
use printshop_infra::database::{
    DbManager, SqliteAuditLogRepository, SqliteClientRepository, SqliteIncidentRepository,
    SqliteInvoiceRepository, SqliteOrderRepository, SqlitePhaseRepository,
    SqliteProductRepository, SqliteProviderRepository, SqlitePurchaseOrderRepository,
    SqliteUserProfileRepository, SqliteWorkflowStore,
};
use printshop_infra::FileSessionStore;
use tempfile::TempDir;

/// 2026-10-15T12:00:00Z
pub const NOW: i64 = 1_792_065_600;

pub struct SqliteHarness {
    _temp_dir: TempDir,
    pub db: Arc<DbManager>,
    pub clock: FixedClock,
    pub users: Arc<SqliteUserProfileRepository>,
    pub order_repo: Arc<SqliteOrderRepository>,
    pub phase_repo: Arc<SqlitePhaseRepository>,
    pub audit_repo: Arc<SqliteAuditLogRepository>,
    pub sessions: Arc<FileSessionStore>,
    pub audit: Arc<AuditService>,
    pub gate: Arc<SessionGate>,
    pub clients: ClientService,
    pub orders: OrderService,
    pub billing: BillingService,
    pub inventory: InventoryService,
    pub admin: AdminService,
    pub pre_press: PhaseService,
    pub press: PhaseService,
    pub post_press: PhaseService,
}

impl SqliteHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temporary directory should be created");
        let db = Arc::new(
            DbManager::new(temp_dir.path().join("printshop.db"), 4)
                .expect("database manager should initialise"),
        );
        db.run_migrations().expect("schema should apply");

        let clock = FixedClock::new(NOW);
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());

        let users = Arc::new(SqliteUserProfileRepository::new(Arc::clone(&db)));
        let order_repo = Arc::new(SqliteOrderRepository::new(Arc::clone(&db)));
        let phase_repo = Arc::new(SqlitePhaseRepository::new(Arc::clone(&db)));
        let audit_repo = Arc::new(SqliteAuditLogRepository::new(Arc::clone(&db)));
        let clients_repo = Arc::new(SqliteClientRepository::new(Arc::clone(&db)));
        let incidents = Arc::new(SqliteIncidentRepository::new(Arc::clone(&db)));
        let invoices = Arc::new(SqliteInvoiceRepository::new(Arc::clone(&db)));
        let products = Arc::new(SqliteProductRepository::new(Arc::clone(&db)));
        let providers = Arc::new(SqliteProviderRepository::new(Arc::clone(&db)));
        let purchases = Arc::new(SqlitePurchaseOrderRepository::new(Arc::clone(&db)));
        let store = Arc::new(SqliteWorkflowStore::new(Arc::clone(&db)));
        let sessions = Arc::new(FileSessionStore::new(temp_dir.path().join("session.json")));

        let audit = Arc::new(
            AuditService::new(audit_repo.clone(), sessions.clone()).with_clock(shared.clone()),
        );
        let gate = Arc::new(
            SessionGate::new(sessions.clone(), users.clone(), audit.clone())
                .with_clock(shared.clone()),
        );
        let engine = Arc::new(
            WorkflowEngine::new(order_repo.clone(), phase_repo.clone(), store, audit.clone())
                .with_clock(shared.clone()),
        );
        let phase_service = |phase: Phase| {
            PhaseService::new(
                phase,
                phase_repo.clone(),
                order_repo.clone(),
                incidents.clone(),
                engine.clone(),
                gate.clone(),
                audit.clone(),
            )
            .with_clock(shared.clone())
        };

        Self {
            clients: ClientService::new(clients_repo.clone(), audit.clone())
                .with_clock(shared.clone()),
            orders: OrderService::new(order_repo.clone(), clients_repo.clone(), audit.clone())
                .with_clock(shared.clone()),
            billing: BillingService::new(
                order_repo.clone(),
                clients_repo,
                invoices,
                audit.clone(),
                BillingConfig::default(),
            )
            .with_clock(shared.clone()),
            inventory: InventoryService::new(
                products,
                providers.clone(),
                purchases,
                audit.clone(),
            )
            .with_clock(shared.clone()),
            admin: AdminService::new(
                users.clone(),
                providers,
                order_repo.clone(),
                phase_repo.clone(),
                engine.clone(),
                audit.clone(),
            )
            .with_clock(shared.clone()),
            pre_press: phase_service(Phase::PrePress),
            press: phase_service(Phase::Press),
            post_press: phase_service(Phase::PostPress),
            _temp_dir: temp_dir,
            db,
            clock,
            users,
            order_repo,
            phase_repo,
            audit_repo,
            sessions,
            audit,
            gate,
        }
    }

    /// Register a staff member and sign them in through the session gate
    pub async fn sign_in_as(&self, id: &str, role: Role) {
        let email = format!("{id}@printshop.test");
        if self.users.get_by_id(id).await.unwrap().is_none() {
            self.users
                .create(UserProfile {
                    id: id.to_string(),
                    email: email.clone(),
                    full_name: format!("Staff {id}"),
                    role,
                    status: UserStatus::Offline,
                    created_at: NOW,
                    updated_at: NOW,
                })
                .await
                .unwrap();
        }
        self.gate.sign_in(&email, "token").await.unwrap();
    }

    /// Create and convert a one-item quote, returning the production order
    ///
    /// Advances the clock a second first so quote codes never collide.
    pub async fn production_order(&self, total: f64) -> Order {
        self.clock.advance(1);
        let detail = self.orders.create_quote(quote(total)).await.unwrap();
        self.orders.convert_to_order(&detail.order.id).await.unwrap()
    }
}

pub fn quote(total: f64) -> QuoteInput {
    QuoteInput {
        client_id: None,
        notes: None,
        items: vec![ItemInput {
            product: "Flyers A5".to_string(),
            quantity: 1,
            specifications: Some("150g couche, 4/0".to_string()),
            unit_price: total,
        }],
    }
}
