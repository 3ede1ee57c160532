//! Audit service - stamps the acting session and never fails the caller

use std::sync::Arc;

use printshop_common::time::{Clock, SystemClock};
use printshop_domain::constants::{AUDIT_HISTORY_LIMIT, AUDIT_MODULE_HISTORY_LIMIT, SYSTEM_ACTOR};
use printshop_domain::{AuditEntry, Result};
use tracing::warn;
use uuid::Uuid;

use super::ports::AuditLogRepository;
use crate::session::ports::SessionStore;

pub struct AuditService {
    repository: Arc<dyn AuditLogRepository>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl AuditService {
    pub fn new(repository: Arc<dyn AuditLogRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { repository, sessions, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Append an entry for the signed-in actor (or `system`)
    ///
    /// Failures are logged and swallowed so the triggering operation
    /// always completes.
    pub async fn record(&self, action: &str, detail: &str) {
        let actor = match self.sessions.load().await {
            Ok(session) => session.map(|session| session.actor()),
            Err(err) => {
                warn!(error = %err, action, "Could not read session for audit entry");
                None
            }
        };

        let entry = AuditEntry {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            details: detail.to_string(),
            user_id: actor.as_ref().map(|actor| actor.id.clone()),
            user_email: actor.map_or_else(|| SYSTEM_ACTOR.to_string(), |actor| actor.email),
            created_at: self.clock.now(),
        };

        if let Err(err) = self.repository.append(entry).await {
            warn!(error = %err, action, "Failed to write audit entry");
        }
    }

    /// Global history, newest first
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        self.repository.list_recent(limit.unwrap_or(AUDIT_HISTORY_LIMIT)).await
    }

    /// History of one module, identified by its action tags
    pub async fn history_for(&self, actions: &[&str]) -> Result<Vec<AuditEntry>> {
        self.repository.list_by_actions(actions, AUDIT_MODULE_HISTORY_LIMIT).await
    }

    /// Entries mentioning `needle` in their details, oldest first
    pub async fn search(&self, needle: &str) -> Result<Vec<AuditEntry>> {
        if needle.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.search(needle.trim()).await
    }
}
