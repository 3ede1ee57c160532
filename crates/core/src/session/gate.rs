//! Session gate - sign in/out and role-based module access

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_domain::constants::audit;
use printshop_domain::{Actor, Module, PrintShopError, Result, Session, UserStatus};
use tracing::{info, warn};

use super::ports::SessionStore;
use crate::audit::AuditService;
use crate::user::ports::UserProfileRepository;

/// Owns the local session mirror
///
/// Authentication itself happens outside this system; `sign_in` receives an
/// already-issued token and binds it to the staff profile with that email.
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserProfileRepository>,
    audit: Arc<AuditService>,
    clock: Arc<dyn Clock>,
}

impl SessionGate {
    pub fn new(
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserProfileRepository>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self { store, users, audit, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn sign_in(&self, email: &str, token: &str) -> Result<Session> {
        if token.trim().is_empty() {
            return Err(PrintShopError::Auth("A session token is required".to_string()));
        }
        let profile = self.users.get_by_email(email.trim()).await?.ok_or_else(|| {
            PrintShopError::Auth(format!("No staff profile is registered for {}", email.trim()))
        })?;

        let session = Session {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.full_name.clone(),
            role: profile.role,
            token: token.trim().to_string(),
        };
        self.store.save(&session).await?;
        self.set_presence(&profile.id, UserStatus::Online).await;

        info!(user_id = %session.id, role = %session.role, "Session started");
        let detail = format!("{} signed in as {}", session.email, session.role.display_name());
        self.audit.record(audit::SESSION_STARTED, &detail).await;
        Ok(session)
    }

    /// Clear the session; signing out without a session is a no-op
    pub async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.store.load().await? else {
            return Ok(());
        };
        self.audit.record(audit::SESSION_ENDED, &format!("{} signed out", session.email)).await;
        self.store.clear().await?;
        self.set_presence(&session.id, UserStatus::Offline).await;
        info!(user_id = %session.id, "Session ended");
        Ok(())
    }

    pub async fn current(&self) -> Result<Option<Session>> {
        self.store.load().await
    }

    pub async fn current_actor(&self) -> Result<Option<Actor>> {
        Ok(self.store.load().await?.map(|session| session.actor()))
    }

    /// The current session, if its role may open `module`
    ///
    /// # Errors
    /// `Auth` when nobody is signed in or the role maps to another module.
    pub async fn require_module(&self, module: Module) -> Result<Session> {
        let session = self
            .store
            .load()
            .await?
            .ok_or_else(|| PrintShopError::Auth("Sign in to continue".to_string()))?;
        if !session.role.can_access(module) {
            return Err(PrintShopError::Auth(format!(
                "{} cannot open the {} module",
                session.role.display_name(),
                module
            )));
        }
        Ok(session)
    }

    async fn set_presence(&self, user_id: &str, status: UserStatus) {
        if let Err(err) = self.users.set_status(user_id, status, self.clock.now()).await {
            warn!(error = %err, user_id, "Failed to update user presence");
        }
    }
}
