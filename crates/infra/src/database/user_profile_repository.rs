//! User profile repository implementation using SQLite
//!
//! Provides persistence for the staff directory: profiles, roles and the
//! online/offline presence flag.

use std::sync::Arc;

use async_trait::async_trait;
use printshop_core::user::UserProfileRepository as UserProfileRepositoryPort;
use printshop_domain::{PrintShopError, Result as DomainResult, UserProfile, UserStatus};
use rusqlite::{params, Row};

use super::manager::DbManager;
use super::support::{label, map_storage_error, spawn_db};

const USER_COLUMNS: &str = "id, email, full_name, role, status, created_at, updated_at";

/// SQLite-backed implementation of `UserProfileRepository`
pub struct SqliteUserProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteUserProfileRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserProfileRepositoryPort for SqliteUserProfileRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.query_optional(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                map_user_profile_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<Option<UserProfile>> {
        let email = email.trim().to_string();
        spawn_db(&self.db, move |conn| {
            // The column is declared COLLATE NOCASE
            conn.query_optional(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                map_user_profile_row,
            )
            .map_err(map_storage_error)
        })
        .await
    }

    async fn list(&self) -> DomainResult<Vec<UserProfile>> {
        spawn_db(&self.db, |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY full_name COLLATE NOCASE"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![], map_user_profile_row).map_err(map_storage_error)
        })
        .await
    }

    async fn create(&self, profile: UserProfile) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                params![
                    profile.id,
                    profile.email,
                    profile.full_name,
                    profile.role.as_str(),
                    profile.status.as_str(),
                    profile.created_at,
                    profile.updated_at,
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn update(&self, profile: UserProfile) -> DomainResult<()> {
        spawn_db(&self.db, move |conn| {
            let updated = conn
                .execute(
                    "UPDATE users SET email = ?1, full_name = ?2, role = ?3, status = ?4,
                        updated_at = ?5
                     WHERE id = ?6",
                    params![
                        profile.email,
                        profile.full_name,
                        profile.role.as_str(),
                        profile.status.as_str(),
                        profile.updated_at,
                        profile.id, // WHERE clause
                    ],
                )
                .map_err(map_storage_error)?;
            if updated == 0 {
                return Err(PrintShopError::NotFound(format!("User {} not found", profile.id)));
            }
            Ok(())
        })
        .await
    }

    async fn set_status(&self, id: &str, status: UserStatus, now: i64) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute(
                "UPDATE users SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let id = id.to_string();
        spawn_db(&self.db, move |conn| {
            conn.execute("DELETE FROM users WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row to a UserProfile
fn map_user_profile_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        role: label(row, 3)?,
        status: label(row, 4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use printshop_domain::Role;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, SqliteUserProfileRepository) {
        let temp_dir = TempDir::new().unwrap();
        let db = DbManager::new(temp_dir.path().join("users.db"), 2).unwrap();
        db.run_migrations().unwrap();
        (temp_dir, SqliteUserProfileRepository::new(Arc::new(db)))
    }

    fn profile(id: &str, email: &str, name: &str) -> UserProfile {
        UserProfile {
            id: id.into(),
            email: email.into(),
            full_name: name.into(),
            role: Role::PressOperator,
            status: UserStatus::Offline,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let (_dir, repo) = setup();
        repo.create(profile("u-1", "rosa@printshop.test", "Rosa Quispe")).await.unwrap();

        let found = repo.get_by_email("ROSA@PrintShop.test").await.unwrap().unwrap();
        assert_eq!(found.id, "u-1");
        assert_eq!(found.role, Role::PressOperator);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (_dir, repo) = setup();
        repo.create(profile("u-1", "rosa@printshop.test", "Rosa")).await.unwrap();

        let err = repo.create(profile("u-2", "Rosa@printshop.test", "Rosa 2")).await.unwrap_err();
        assert!(matches!(err, PrintShopError::Conflict(_)));
    }

    #[tokio::test]
    async fn presence_and_listing() {
        let (_dir, repo) = setup();
        repo.create(profile("u-2", "zoe@printshop.test", "Zoe")).await.unwrap();
        repo.create(profile("u-1", "ana@printshop.test", "ana")).await.unwrap();

        repo.set_status("u-2", UserStatus::Online, 5).await.unwrap();
        let zoe = repo.get_by_id("u-2").await.unwrap().unwrap();
        assert_eq!(zoe.status, UserStatus::Online);
        assert_eq!(zoe.updated_at, 5);

        let names: Vec<String> =
            repo.list().await.unwrap().into_iter().map(|u| u.full_name).collect();
        assert_eq!(names, vec!["ana".to_string(), "Zoe".to_string()]);

        repo.delete("u-1").await.unwrap();
        assert!(repo.get_by_id("u-1").await.unwrap().is_none());
        let err = repo.update(profile("u-1", "ana@printshop.test", "Ana")).await.unwrap_err();
        assert!(matches!(err, PrintShopError::NotFound(_)));
    }
}
