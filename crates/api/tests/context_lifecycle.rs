//! AppContext construction, health and schema commands.

mod support;

use printshop_api as api;
use printshop_domain::Role;
use support::{create_test_context, sign_in_as};

#[tokio::test(flavor = "multi_thread")]
async fn fresh_context_is_migrated_and_healthy() {
    let (ctx, dir) = create_test_context();
    assert!(dir.path().join("printshop.db").exists());

    let health = api::get_app_health(&ctx).await;
    assert!(health.is_healthy, "unexpected report: {health:?}");
    assert_eq!(health.score, 1.0);

    let names: Vec<&str> = health.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["database", "schema", "session_store"]);
    assert_eq!(health.components[1].message.as_deref(), Some("version 1"));
    assert_eq!(health.components[2].message.as_deref(), Some("signed out"));
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let (ctx, _dir) = create_test_context();

    let first = api::migrate(&ctx).await.unwrap();
    let second = api::migrate(&ctx).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.schema_version, Some(1));
    assert!(second.path.ends_with("printshop.db"));
    assert_eq!(api::schema_info(&ctx).await.unwrap(), second);
}

#[tokio::test(flavor = "multi_thread")]
async fn session_mirror_survives_a_new_context() {
    let (ctx, dir) = create_test_context();
    sign_in_as(&ctx, "press@printshop.test", Role::PressOperator).await;
    let config = ctx.config.clone();
    drop(ctx);

    let reopened = api::AppContext::new_with_config(config).unwrap();
    let session = api::current_session(&reopened).await.unwrap().expect("session should persist");
    assert_eq!(session.email, "press@printshop.test");
    assert_eq!(session.role, Role::PressOperator);
    assert_eq!(
        api::home_module(&reopened).await.unwrap(),
        Some(printshop_domain::Module::Press)
    );

    let health = api::get_app_health(&reopened).await;
    assert_eq!(
        health.components[2].message.as_deref(),
        Some("signed in as press@printshop.test")
    );
    drop(dir);
}
