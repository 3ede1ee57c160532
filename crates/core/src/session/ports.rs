//! Port interfaces for the session mirror

use async_trait::async_trait;
use printshop_domain::{Result, Session};

/// Storage for the single local session mirror
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;

    async fn save(&self, session: &Session) -> Result<()>;

    /// Remove the mirror; clearing an absent session succeeds
    async fn clear(&self) -> Result<()>;
}
