//! Staff user profiles

use serde::{Deserialize, Serialize};

use super::session::Role;
use crate::impl_domain_status_conversions;

/// Staff member stored in the local directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Presence flag shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
}

impl_domain_status_conversions!(UserStatus {
    Online => "online",
    Offline => "offline",
});

/// Fields accepted when creating or editing a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub email: String,
    pub full_name: String,
    pub role: Role,
}
