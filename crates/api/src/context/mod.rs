//! Application context - dependency injection container

use std::sync::Arc;

use printshop_core::admin::AdminService;
use printshop_core::audit::AuditService;
use printshop_core::crm::{BillingService, ClientService, OrderService};
use printshop_core::inventory::InventoryService;
use printshop_core::production::PhaseService;
use printshop_core::session::{SessionGate, SessionStore};
use printshop_core::workflow::WorkflowEngine;
use printshop_domain::{Config, Phase, PrintShopError, Result};
use printshop_infra::database::{
    DbManager, SqliteAuditLogRepository, SqliteClientRepository, SqliteIncidentRepository,
    SqliteInvoiceRepository, SqliteOrderRepository, SqlitePhaseRepository,
    SqliteProductRepository, SqliteProviderRepository, SqlitePurchaseOrderRepository,
    SqliteUserProfileRepository, SqliteWorkflowStore,
};
use printshop_infra::FileSessionStore;
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub sessions: Arc<FileSessionStore>,

    pub audit: Arc<AuditService>,
    pub gate: Arc<SessionGate>,
    pub engine: Arc<WorkflowEngine>,

    pub clients: ClientService,
    pub orders: OrderService,
    pub billing: BillingService,
    pub inventory: InventoryService,
    pub admin: AdminService,

    pre_press: PhaseService,
    press: PhaseService,
    post_press: PhaseService,
}

impl AppContext {
    /// Load configuration (env, `.env`, config files) and build the context
    pub fn new() -> Result<Self> {
        let config = printshop_infra::config::load()?;
        Self::new_with_config(config)
    }

    /// Build the context from an explicit configuration
    ///
    /// Opens the pool and applies the schema, so a fresh database file is
    /// usable right away.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let users = Arc::new(SqliteUserProfileRepository::new(Arc::clone(&db)));
        let order_repo = Arc::new(SqliteOrderRepository::new(Arc::clone(&db)));
        let phase_repo = Arc::new(SqlitePhaseRepository::new(Arc::clone(&db)));
        let audit_repo = Arc::new(SqliteAuditLogRepository::new(Arc::clone(&db)));
        let client_repo = Arc::new(SqliteClientRepository::new(Arc::clone(&db)));
        let incidents = Arc::new(SqliteIncidentRepository::new(Arc::clone(&db)));
        let invoices = Arc::new(SqliteInvoiceRepository::new(Arc::clone(&db)));
        let products = Arc::new(SqliteProductRepository::new(Arc::clone(&db)));
        let providers = Arc::new(SqliteProviderRepository::new(Arc::clone(&db)));
        let purchases = Arc::new(SqlitePurchaseOrderRepository::new(Arc::clone(&db)));
        let store = Arc::new(SqliteWorkflowStore::new(Arc::clone(&db)));
        let sessions = Arc::new(FileSessionStore::from_config(&config.session));

        let audit = Arc::new(AuditService::new(audit_repo, sessions.clone()));
        let gate = Arc::new(SessionGate::new(sessions.clone(), users.clone(), audit.clone()));
        let engine = Arc::new(WorkflowEngine::new(
            order_repo.clone(),
            phase_repo.clone(),
            store,
            audit.clone(),
        ));

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
        };
        let pre_press = phase_service(Phase::PrePress);
        let press = phase_service(Phase::Press);
        let post_press = phase_service(Phase::PostPress);

        let clients = ClientService::new(client_repo.clone(), audit.clone());
        let orders = OrderService::new(order_repo.clone(), client_repo.clone(), audit.clone());
        let billing = BillingService::new(
            order_repo.clone(),
            client_repo,
            invoices,
            audit.clone(),
            config.billing.clone(),
        );
        let inventory =
            InventoryService::new(products, providers.clone(), purchases, audit.clone());
        let admin = AdminService::new(
            users,
            providers,
            order_repo,
            phase_repo,
            engine.clone(),
            audit.clone(),
        );

        info!(
            db_path = %db.path().display(),
            session_path = %sessions.path().display(),
            "application context ready"
        );

        Ok(Self {
            config,
            db,
            sessions,
            audit,
            gate,
            engine,
            clients,
            orders,
            billing,
            inventory,
            admin,
            pre_press,
            press,
            post_press,
        })
    }

    /// Service behind one production module
    pub fn phase_service(&self, phase: Phase) -> &PhaseService {
        match phase {
            Phase::PrePress => &self.pre_press,
            Phase::Press => &self.press,
            Phase::PostPress => &self.post_press,
        }
    }

    /// Run the component checks and fold them into one report
    ///
    /// # Example
    /// ```no_run
    /// # async fn demo(context: printshop_api::AppContext) {
    /// let health = context.health_check().await;
    /// if !health.is_healthy {
    ///     for component in health.components.iter().filter(|c| !c.is_healthy) {
    ///         eprintln!("{} is unhealthy: {:?}", component.name, component.message);
    ///     }
    /// }
    /// # }
    /// ```
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new()
            .add_component(self.check_database_health().await)
            .add_component(self.check_schema().await)
            .add_component(self.check_session_store().await);

        status.calculate_score();
        status
    }

    /// `SELECT 1` on a pooled connection, off the async runtime
    async fn check_database_health(&self) -> ComponentHealth {
        let db = self.db.clone();
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => {
                warn!(error = %err, "database health check failed");
                ComponentHealth::unhealthy("database", err.to_string())
            }
            Err(join_err) => ComponentHealth::unhealthy(
                "database",
                format!("health check task panicked: {join_err}"),
            ),
        }
    }

    async fn check_schema(&self) -> ComponentHealth {
        let db = self.db.clone();
        let version = tokio::task::spawn_blocking(move || db.schema_version())
            .await
            .map_err(|e| PrintShopError::Internal(format!("schema check task failed: {e}")))
            .and_then(|inner| inner);

        match version {
            Ok(Some(version)) => {
                ComponentHealth::healthy("schema").with_message(format!("version {version}"))
            }
            Ok(None) => ComponentHealth::unhealthy("schema", "schema has not been applied"),
            Err(err) => ComponentHealth::unhealthy("schema", err.to_string()),
        }
    }

    async fn check_session_store(&self) -> ComponentHealth {
        match self.sessions.load().await {
            Ok(Some(session)) => ComponentHealth::healthy("session_store")
                .with_message(format!("signed in as {}", session.email)),
            Ok(None) => ComponentHealth::healthy("session_store").with_message("signed out"),
            Err(err) => ComponentHealth::unhealthy("session_store", err.to_string()),
        }
    }
}
