//! Handlers for `/auth`: registration and the cookie session lifecycle.
//!
//! A session is three cookies: the access JWT, the opaque refresh token
//! (only its hash is stored) and the CSRF token scripts echo back in
//! `X-CSRF-Token`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::AppendHeaders;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use soundstage_core::error::CoreError;
use soundstage_core::roles::ROLE_USER;
use soundstage_core::types::DbId;
use soundstage_db::models::session::CreateSession;
use soundstage_db::models::user::{CreateUser, User, UserResponse};
use soundstage_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::cookies::{cleared_cookies, read_cookie, session_cookies, REFRESH_COOKIE};
use crate::auth::csrf::generate_csrf_token;
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientMeta;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failures before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a lockout lasts.
const LOCK_DURATION_MINS: i64 = 15;

type SessionCookies = AppendHeaders<[(HeaderName, String); 3]>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`. `login` is a username or an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

/// Optional body of `POST /auth/refresh`, for clients that cannot send the
/// path-scoped refresh cookie.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Returned by login and refresh alongside the cookies.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    /// Same value as the `csrf_token` cookie.
    pub csrf_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = RoleRepo::find_by_name(&state.pool, ROLE_USER)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{ROLE_USER}' is not seeded")))?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = user_response(&state, user.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(input): Json<LoginRequest>,
) -> AppResult<(SessionCookies, Json<DataResponse<SessionResponse>>)> {
    let user = UserRepo::find_by_login(&state.pool, input.login.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, failures, %until, "Account locked");
        }
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    start_session(&state, &user, &meta).await
}

/// POST /api/auth/refresh
///
/// Rotates the refresh token: the presented session is revoked and a new
/// one issued with fresh cookies.
pub async fn refresh(
    State(state): State<AppState>,
    meta: ClientMeta,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(SessionCookies, Json<DataResponse<SessionResponse>>)> {
    let presented = match read_cookie(&headers, REFRESH_COOKIE) {
        Some(token) => token,
        None => refresh_token_from_body(&body)?,
    };

    let session = SessionRepo::find_active_by_hash(&state.pool, &hash_refresh_token(&presented))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        // Lost a race with another refresh of the same token.
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    start_session(&state, &user, &meta).await
}

/// POST /api/auth/logout
///
/// Revokes every session of the caller and expires the cookies.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, SessionCookies)> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    tracing::info!(user_id = user.user_id, revoked, "User logged out");
    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders(cleared_cookies(&state.config)),
    ))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let response = user_response(&state, user.user_id).await?;
    Ok(Json(DataResponse::new(response)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

fn refresh_token_from_body(body: &Bytes) -> AppResult<String> {
    let request: RefreshRequest = if body.is_empty() {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    request
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Missing refresh token".into())))
}

async fn user_response(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_response_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Mint tokens, persist the session row, and build the cookie headers.
async fn start_session(
    state: &AppState,
    user: &User,
    meta: &ClientMeta,
) -> AppResult<(SessionCookies, Json<DataResponse<SessionResponse>>)> {
    let profile = user_response(state, user.id).await?;
    let jwt = &state.config.jwt;

    let access_token = generate_access_token(user.id, &profile.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_token, refresh_hash) = generate_refresh_token();
    let csrf_token = generate_csrf_token();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + Duration::days(jwt.refresh_token_expiry_days),
            user_agent: meta.user_agent.clone(),
            ip_address: meta.ip.clone(),
        },
    )
    .await?;

    let cookies = session_cookies(&state.config, &access_token, &refresh_token, &csrf_token);
    Ok((
        AppendHeaders(cookies),
        Json(DataResponse::new(SessionResponse {
            user: profile,
            csrf_token,
            expires_in: jwt.access_max_age_secs(),
        })),
    ))
}
