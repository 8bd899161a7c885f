//! Shared helpers for the HTTP integration tests.
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`;
//! no socket is opened.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use soundstage_api::auth::jwt::JwtConfig;
use soundstage_api::auth::password::hash_password;
use soundstage_api::config::ServerConfig;
use soundstage_api::router::build_app_router;
use soundstage_api::state::AppState;
use soundstage_db::models::user::{CreateUser, User};
use soundstage_db::repositories::UserRepo;

pub const ROLE_ADMIN_ID: i64 = 1;
pub const ROLE_EDITOR_ID: i64 = 2;
pub const ROLE_USER_ID: i64 = 3;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// Cookies are not marked `Secure` and uploads are capped at 1 KiB.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir().join("soundstage-test-uploads"),
        upload_max_bytes: 1024,
        analytics_retention_days: 90,
        cookie_secure: false,
        jwt: JwtConfig {
            secret: "test-secret-do-not-use-in-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, with the production middleware
/// stack, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Same as [`build_test_app`] with a custom configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Config whose uploads land in `dir`.
pub fn config_with_upload_dir(dir: PathBuf) -> ServerConfig {
    ServerConfig {
        upload_dir: dir,
        ..test_config()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly in the database.
pub async fn seed_user(pool: &PgPool, username: &str, role_id: i64) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// The three auth cookies and the JSON body of a successful login.
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
    pub body: serde_json::Value,
}

impl Session {
    /// `Cookie` header value carrying the whole session.
    pub fn cookie_header(&self) -> String {
        format!(
            "access_token={}; refresh_token={}; csrf_token={}",
            self.access_token, self.refresh_token, self.csrf_token
        )
    }
}

/// Log in through the API and collect the issued cookies.
pub async fn login(app: &Router, login: &str, password: &str) -> Session {
    let body = serde_json::json!({ "login": login, "password": password });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    session_from(response).await
}

/// Parse the cookies and body of a login or refresh response.
pub async fn session_from(response: Response<Body>) -> Session {
    let cookie = |name: &str| set_cookie_value(&response, name).unwrap_or_default();
    let access_token = cookie("access_token");
    let refresh_token = cookie("refresh_token");
    let csrf_token = cookie("csrf_token");
    let body = body_json(response).await;
    Session {
        access_token,
        refresh_token,
        csrf_token,
        body,
    }
}

/// Value of cookie `name` from the response's `Set-Cookie` headers.
pub fn set_cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookie_header(response, name)?
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
}

/// Full `Set-Cookie` header for cookie `name`.
pub fn set_cookie_header(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, json_request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, json_request(Method::DELETE, uri, Some(token), None)).await
}

/// A cookie-authenticated request, optionally echoing the CSRF token.
pub async fn send_with_cookies(
    app: &Router,
    method: Method,
    uri: &str,
    session: &Session,
    csrf_header: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, session.cookie_header());
    if let Some(csrf) = csrf_header {
        builder = builder.header("x-csrf-token", csrf);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

/// Collect the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
