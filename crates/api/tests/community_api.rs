//! Integration tests for playlists and content reports.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, login, post_json_auth, put_json_auth, seed_user,
    ROLE_EDITOR_ID, ROLE_USER_ID, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

/// Seed an editor, one artist and one song; returns `(editor_token, song_id)`.
async fn seed_song(app: &axum::Router, pool: &PgPool) -> (String, i64) {
    seed_user(pool, "editor", ROLE_EDITOR_ID).await;
    let token = login(app, "editor", TEST_PASSWORD).await.access_token;

    let response = post_json_auth(app, "/api/artists", &token, json!({ "name": "Nightjar" })).await;
    let artist_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let response = post_json_auth(
        app,
        "/api/songs",
        &token,
        json!({ "title": "Dusk", "artist_ids": [artist_id] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let song_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    (token, song_id)
}

async fn user_token(app: &axum::Router, pool: &PgPool, username: &str) -> String {
    seed_user(pool, username, ROLE_USER_ID).await;
    login(app, username, TEST_PASSWORD).await.access_token
}

async fn create_playlist(app: &axum::Router, token: &str, is_public: bool) -> i64 {
    let response = post_json_auth(
        app,
        "/api/playlists",
        token,
        json!({ "name": "Evening", "is_public": is_public }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_manages_playlist_songs(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, song_id) = seed_song(&app, &pool).await;
    let owner = user_token(&app, &pool, "owner").await;
    let playlist_id = create_playlist(&app, &owner, true).await;
    let songs_uri = format!("/api/playlists/{playlist_id}/songs");

    let response = post_json_auth(&app, &songs_uri, &owner, json!({ "song_id": song_id })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let entries = body_json(response).await;
    assert_eq!(entries["data"][0]["song_id"], song_id);

    let response = post_json_auth(&app, &songs_uri, &owner, json!({ "song_id": song_id })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(&app, &songs_uri, &owner, json!({ "song_id": 999_999 })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(&app, &format!("{songs_uri}/{song_id}"), &owner).await;
    assert!(response.status().is_success());

    let response = delete_auth(&app, &format!("{songs_uri}/{song_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_playlist_is_invisible_to_others(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let owner = user_token(&app, &pool, "owner").await;
    let other = user_token(&app, &pool, "other").await;
    let playlist_id = create_playlist(&app, &owner, false).await;
    let uri = format!("/api/playlists/{playlist_id}");

    assert_eq!(get_auth(&app, &uri, &owner).await.status(), StatusCode::OK);
    assert_eq!(get_auth(&app, &uri, &other).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);

    let listed = body_json(get(&app, "/api/playlists").await).await;
    assert_eq!(listed["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_playlist_is_read_only_to_others(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, song_id) = seed_song(&app, &pool).await;
    let owner = user_token(&app, &pool, "owner").await;
    let other = user_token(&app, &pool, "other").await;
    let playlist_id = create_playlist(&app, &owner, true).await;

    let response = get(&app, &format!("/api/playlists/{playlist_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        &app,
        &format!("/api/playlists/{playlist_id}/songs"),
        &other,
        json!({ "song_id": song_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(&app, &format!("/api/playlists/{playlist_id}"), &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_moderation_flow_hides_content(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (editor, song_id) = seed_song(&app, &pool).await;
    let reporter = user_token(&app, &pool, "reporter").await;

    let body = json!({ "entity_type": "song", "entity_id": song_id, "reason": "spam" });
    let response = post_json_auth(&app, "/api/reports", &reporter, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = body_json(response).await;
    assert_eq!(report["data"]["status"], "open");
    let report_id = report["data"]["id"].as_i64().unwrap();

    // One open report per reporter and target.
    let response = post_json_auth(&app, "/api/reports", &reporter, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Reporters cannot see the moderation queue.
    let response = get_auth(&app, "/api/reports", &reporter).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let status_uri = format!("/api/reports/{report_id}/status");
    let response =
        put_json_auth(&app, &status_uri, &editor, json!({ "status": "resolved" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "open cannot jump to resolved");

    let response =
        put_json_auth(&app, &status_uri, &editor, json!({ "status": "reviewing" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        &app,
        &status_uri,
        &editor,
        json!({ "status": "resolved", "resolution_note": "removed", "hide_content": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = body_json(response).await;
    assert_eq!(resolved["data"]["status"], "resolved");
    assert!(resolved["data"]["resolved_by"].is_i64());

    let response = get(&app, &format!("/api/songs/{song_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_targets_are_checked(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let reporter = user_token(&app, &pool, "reporter").await;

    let response = post_json_auth(
        &app,
        "/api/reports",
        &reporter,
        json!({ "entity_type": "song", "entity_id": 424_242, "reason": "missing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        &app,
        "/api/reports",
        &reporter,
        json!({ "entity_type": "user", "entity_id": 1, "reason": "rude" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
