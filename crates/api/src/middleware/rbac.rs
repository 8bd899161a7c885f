//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement: 401 without credentials, 403 with the wrong
//! role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use soundstage_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then check the caller against `allowed`.
async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(&AuthUser) -> bool,
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed(&user) {
        Ok(user)
    } else {
        tracing::debug!(user_id = user.user_id, role = %user.role, denied, "Role check failed");
        Err(AppError::Core(CoreError::Forbidden(denied.into())))
    }
}

/// Requires the `admin` role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, AuthUser::is_admin, "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Requires `editor` or `admin`, the roles that manage catalogue content.
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, AuthUser::can_edit, "Editor or Admin role required")
            .await
            .map(RequireEditor)
    }
}

/// Requires any signed-in user, whatever the role.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, |_| true, "").await.map(RequireAuth)
    }
}
