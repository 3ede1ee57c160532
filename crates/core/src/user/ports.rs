//! Storage seam for staff profiles
//!
//! Admin maintenance and the session gate both resolve staff through this
//! trait; SQLite and the in-memory test double implement it.

use async_trait::async_trait;
use printshop_domain::{Result, UserProfile, UserStatus};

#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<UserProfile>>;

    /// Lookup ignores case
    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>>;

    /// Every profile, sorted by full name
    async fn list(&self) -> Result<Vec<UserProfile>>;

    async fn create(&self, profile: UserProfile) -> Result<()>;

    /// Overwrites name, email and role of an existing profile
    async fn update(&self, profile: UserProfile) -> Result<()>;

    /// Flip the online/offline flag, stamping `now` as last activity
    async fn set_status(&self, id: &str, status: UserStatus, now: i64) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
