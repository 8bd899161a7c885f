//! Handlers for `/admin/users` (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use soundstage_core::error::CoreError;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::user::{CreateUser, UpdateUser, UserFilter, UserResponse};
use soundstage_db::repositories::{SessionRepo, UserRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    pub role_id: DbId,
}

/// Body of `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Body of `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    let password_hash = hashed(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role_id: input.role_id,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User created by admin");

    let response = load_response(&state.pool, user.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<ListResponse<UserResponse>>> {
    let page = Page::new(filter.limit, filter.offset);
    let users = UserRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(users.into()))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let response = load_response(&state.pool, id).await?;
    Ok(Json(DataResponse::new(response)))
}

/// PUT /api/admin/users/{id}
///
/// Deactivating through this endpoint also revokes the user's sessions.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    let update = UpdateUser {
        email: input.email,
        role_id: input.role_id,
        is_active: input.is_active,
    };
    UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if update.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    let response = load_response(&state.pool, id).await?;
    Ok(Json(DataResponse::new(response)))
}

/// DELETE /api/admin/users/{id}
///
/// Deactivates rather than deletes, and ends every session of the user.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot deactivate their own account".into(),
        )));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, revoked, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/users/{id}/reset-password
///
/// Also clears any lockout and signs the user out everywhere.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    let password_hash = hashed(&input.new_password)?;
    if !UserRepo::update_password(&state.pool, id, &password_hash).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hashed(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

async fn load_response(pool: &PgPool, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_response_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}
