//! Integration tests for admin user management and the analytics summary.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login, post_json, post_json_auth, put_json_auth,
    seed_user, ROLE_ADMIN_ID, ROLE_EDITOR_ID, ROLE_USER_ID, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_and_lists_users(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_user(&pool, "admin", ROLE_ADMIN_ID).await;
    let admin = login(&app, "admin", TEST_PASSWORD).await.access_token;

    let response = post_json_auth(
        &app,
        "/api/admin/users",
        &admin,
        json!({
            "username": "staffer",
            "email": "staffer@test.com",
            "password": "a sound password",
            "role_id": ROLE_EDITOR_ID,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "editor");

    let listed = body_json(get_auth(&app, "/api/admin/users", &admin).await).await;
    assert_eq!(listed["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_are_refused(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_user(&pool, "editor", ROLE_EDITOR_ID).await;
    let editor = login(&app, "editor", TEST_PASSWORD).await.access_token;

    let response = get_auth(&app, "/api/admin/users", &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(&app, "/api/admin/analytics/summary", &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivation_ends_sessions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin_user = seed_user(&pool, "admin", ROLE_ADMIN_ID).await;
    let target = seed_user(&pool, "member", ROLE_USER_ID).await;
    let admin = login(&app, "admin", TEST_PASSWORD).await.access_token;
    let member = login(&app, "member", TEST_PASSWORD).await;

    let response =
        delete_auth(&app, &format!("/api/admin/users/{}", admin_user.id), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "admins cannot deactivate themselves");

    let response = delete_auth(&app, &format!("/api/admin/users/{}", target.id), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        &app,
        "/api/auth/refresh",
        json!({ "refresh_token": member.refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        &app,
        "/api/auth/login",
        json!({ "login": "member", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_password_replaces_credentials(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_user(&pool, "admin", ROLE_ADMIN_ID).await;
    let target = seed_user(&pool, "member", ROLE_USER_ID).await;
    let admin = login(&app, "admin", TEST_PASSWORD).await.access_token;

    let uri = format!("/api/admin/users/{}/reset-password", target.id);
    let response = post_json_auth(&app, &uri, &admin, json!({ "new_password": "short" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        post_json_auth(&app, &uri, &admin, json!({ "new_password": "brand new secret" })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    login(&app, "member", "brand new secret").await;
    let response = post_json(
        &app,
        "/api/auth/login",
        json!({ "login": "member", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_change_via_update(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_user(&pool, "admin", ROLE_ADMIN_ID).await;
    let target = seed_user(&pool, "member", ROLE_USER_ID).await;
    let admin = login(&app, "admin", TEST_PASSWORD).await.access_token;

    let response = put_json_auth(
        &app,
        &format!("/api/admin/users/{}", target.id),
        &admin,
        json!({ "role_id": ROLE_EDITOR_ID }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "editor");

    let response = put_json_auth(
        &app,
        "/api/admin/users/999999",
        &admin,
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analytics_summary_clamps_days(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed_user(&pool, "admin", ROLE_ADMIN_ID).await;
    let admin = login(&app, "admin", TEST_PASSWORD).await.access_token;

    let json = body_json(get_auth(&app, "/api/admin/analytics/summary", &admin).await).await;
    assert_eq!(json["data"]["days"], 30);

    let json =
        body_json(get_auth(&app, "/api/admin/analytics/summary?days=5000", &admin).await).await;
    assert_eq!(json["data"]["days"], 365);
    assert!(json["data"]["totals"].is_array());
    assert!(json["data"]["top_targets"].is_array());
}
