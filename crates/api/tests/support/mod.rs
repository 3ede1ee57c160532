//! Shared setup for `printshop-api` integration tests.

#![allow(dead_code)]

use printshop_api::AppContext;
use printshop_domain::{
    Config, DatabaseConfig, ItemInput, QuoteInput, Role, SessionConfig, UserInput,
};
use tempfile::TempDir;

/// Build a context over a fresh database and session file.
///
/// Returns the temp dir too so it outlives the context.
pub fn create_test_context() -> (AppContext, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temporary test directory");
    let config = Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("printshop.db").to_string_lossy().to_string(),
            pool_size: 4,
        },
        session: SessionConfig {
            path: temp_dir.path().join("session.json").to_string_lossy().to_string(),
        },
        ..Config::default()
    };

    let ctx = AppContext::new_with_config(config).expect("context should initialise");
    (ctx, temp_dir)
}

/// Register a staff profile straight through the admin service
pub async fn register(ctx: &AppContext, email: &str, role: Role) {
    ctx.admin
        .create_user(UserInput {
            email: email.to_string(),
            full_name: format!("Staff {role}"),
            role,
        })
        .await
        .expect("staff profile should be created");
}

/// Register and sign in through the session command
pub async fn sign_in_as(ctx: &AppContext, email: &str, role: Role) {
    if ctx.admin.list_users().await.unwrap().iter().all(|user| user.email != email) {
        register(ctx, email, role).await;
    }
    printshop_api::login(ctx, email, "token").await.expect("login should succeed");
}

pub fn one_item_quote(total: f64) -> QuoteInput {
    QuoteInput {
        client_id: None,
        notes: Some("Rush job".to_string()),
        items: vec![ItemInput {
            product: "Business cards".to_string(),
            quantity: 1,
            specifications: Some("300g, 4/4".to_string()),
            unit_price: total,
        }],
    }
}
