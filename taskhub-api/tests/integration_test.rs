/// Integration tests for the taskhub API
///
/// These tests exercise the full request path against live Postgres and
/// Redis instances (DATABASE_URL / REDIS_URL / JWT_SECRET must be set), so
/// they are ignored by default:
///
/// ```bash
/// cargo test -p taskhub-api -- --ignored
/// ```
///
/// Covered end-to-end:
/// - Owner-scoped lookups and tenant isolation
/// - Cross-tenant project association rejection
/// - Cache invalidation on create/update/delete and repopulation on list
/// - Patch body validation (overlong title → 422)
/// - Patch presence semantics (omit vs null vs value for project_id)
/// - Delete idempotency-in-effect (second delete is 404)
/// - Project delete cascading tasks

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::{json, Value};

/// Creates a task through the API and returns its JSON representation
async fn create_task(ctx: &TestContext, token: &str, body: Value) -> Value {
    let (status, json) = ctx.call("POST", "/task", token, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    json
}

/// Creates a project through the API and returns its JSON representation
async fn create_project(ctx: &TestContext, token: &str, name: &str) -> Value {
    let (status, json) = ctx
        .call("POST", "/project", token, Some(json!({ "name": name })))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    json
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_create_and_get_task() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let task = create_task(
        &ctx,
        &token,
        json!({ "title": "Buy bread", "description": "Go to the bakery" }),
    )
    .await;

    assert_eq!(task["status"], "pending");
    assert_eq!(task["user_id"], json!(ctx.user.id));

    let uri = format!("/task/{}", task["id"].as_str().unwrap());
    let (status, fetched) = ctx.call("GET", &uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], task["id"]);
    assert_eq!(fetched["project"], Value::Null);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_tenant_isolation_on_get() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();
    let (other, other_token) = ctx.other_user().await.unwrap();

    let task = create_task(
        &ctx,
        &token,
        json!({ "title": "Mine", "description": "Owned by the first user" }),
    )
    .await;

    // The other user sees 404, indistinguishable from absence
    let uri = format!("/task/{}", task["id"].as_str().unwrap());
    let (status, body) = ctx.call("GET", &uri, &other_token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(other.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_create_with_foreign_project_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();
    let (other, other_token) = ctx.other_user().await.unwrap();

    let foreign_project = create_project(&ctx, &other_token, "Not yours").await;

    let (status, _) = ctx
        .call(
            "POST",
            "/task",
            &token,
            Some(json!({
                "title": "Sneaky",
                "description": "Attach to someone else's project",
                "project_id": foreign_project["id"],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing was persisted
    let (status, listing) = ctx.call("GET", "/task", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["tasks"], json!([]));

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(other.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_cache_invalidated_on_create_and_repopulated_on_list() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    // Populate the cache
    let (status, _) = ctx.call("GET", "/task", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctx.cache_key_exists(ctx.user.id).await.unwrap());

    // A create must drop the cached listing
    create_task(
        &ctx,
        &token,
        json!({ "title": "Fresh", "description": "Invalidates the cache" }),
    )
    .await;
    assert!(!ctx.cache_key_exists(ctx.user.id).await.unwrap());

    // The next list repopulates from the store and includes the new task
    let (status, listing) = ctx.call("GET", "/task", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["tasks"].as_array().unwrap().len(), 1);
    assert!(ctx.cache_key_exists(ctx.user.id).await.unwrap());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_patch_presence_semantics_for_project() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let project = create_project(&ctx, &token, "Work").await;
    let task = create_task(
        &ctx,
        &token,
        json!({
            "title": "Write tests",
            "description": "For the task endpoints",
            "project_id": project["id"],
        }),
    )
    .await;
    let uri = format!("/task/{}", task["id"].as_str().unwrap());

    // Patch without project_id: association untouched
    let (status, updated) = ctx
        .call("PATCH", &uri, &token, Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["project_id"], project["id"]);

    // Explicit null: detach
    let (status, updated) = ctx
        .call("PATCH", &uri, &token, Some(json!({ "project_id": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["project_id"], Value::Null);
    assert_eq!(updated["status"], "completed");

    let (_, fetched) = ctx.call("GET", &uri, &token, None).await;
    assert_eq!(fetched["project"], Value::Null);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_cache_invalidated_on_update_and_delete() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let task = create_task(
        &ctx,
        &token,
        json!({ "title": "Mutable", "description": "Patched then deleted" }),
    )
    .await;
    let uri = format!("/task/{}", task["id"].as_str().unwrap());

    // Populate the cache, then patch: the cached listing must be dropped
    let (status, _) = ctx.call("GET", "/task", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctx.cache_key_exists(ctx.user.id).await.unwrap());

    let (status, _) = ctx
        .call("PATCH", &uri, &token, Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ctx.cache_key_exists(ctx.user.id).await.unwrap());

    // Populate again, then delete: same invalidation
    let (status, _) = ctx.call("GET", "/task", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctx.cache_key_exists(ctx.user.id).await.unwrap());

    let (status, _) = ctx.call("DELETE", &uri, &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!ctx.cache_key_exists(ctx.user.id).await.unwrap());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_patch_with_overlong_title_is_unprocessable() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let task = create_task(
        &ctx,
        &token,
        json!({ "title": "Short", "description": "Stays short" }),
    )
    .await;
    let uri = format!("/task/{}", task["id"].as_str().unwrap());

    let (status, body) = ctx
        .call("PATCH", &uri, &token, Some(json!({ "title": "a".repeat(300) })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    // The stored task is untouched
    let (_, fetched) = ctx.call("GET", &uri, &token, None).await;
    assert_eq!(fetched["title"], "Short");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_second_delete_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let task = create_task(
        &ctx,
        &token,
        json!({ "title": "Ephemeral", "description": "Deleted twice" }),
    )
    .await;
    let uri = format!("/task/{}", task["id"].as_str().unwrap());

    let (status, _) = ctx.call("DELETE", &uri, &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx.call("DELETE", &uri, &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_empty_listing_is_not_an_error() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let (status, listing) = ctx.call("GET", "/task", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["tasks"], json!([]));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_project_delete_cascades_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.jwt_token.clone();

    let project = create_project(&ctx, &token, "Doomed").await;
    let task = create_task(
        &ctx,
        &token,
        json!({
            "title": "Goes down with the ship",
            "description": "Cascaded on project delete",
            "project_id": project["id"],
        }),
    )
    .await;

    let uri = format!("/project/{}", project["id"].as_str().unwrap());
    let (status, _) = ctx.call("DELETE", &uri, &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/task/{}", task["id"].as_str().unwrap());
    let (status, _) = ctx.call("GET", &uri, &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Postgres and Redis"]
async fn test_sign_up_conflict_on_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("dup-{}@example.com", uuid::Uuid::new_v4());
    let body = json!({ "name": "Dup", "email": email, "password": "hunter22" });

    let (status, first) = ctx.call("POST", "/auth/sign-up", "", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(first["access_token"].is_string());

    let (status, second) = ctx.call("POST", "/auth/sign-up", "", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(second["error"], "conflict");

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}
