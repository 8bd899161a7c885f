//! Authentication extractors for Axum handlers.
//!
//! Credentials come from an `Authorization: Bearer` header or from the
//! `access_token` cookie. Cookie-authenticated requests with an unsafe method
//! must also pass the double-submit CSRF check.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use soundstage_core::error::CoreError;
use soundstage_core::roles;
use soundstage_core::types::DbId;

use crate::auth::cookies::{read_cookie, ACCESS_COOKIE, CSRF_COOKIE};
use crate::auth::csrf::{is_safe_method, tokens_match, CSRF_HEADER};
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role name from the token (`admin`, `editor`, `user`).
    pub role: String,
}

impl AuthUser {
    /// Admins and editors manage catalogue content.
    pub fn can_edit(&self) -> bool {
        roles::can_edit_content(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == roles::ROLE_ADMIN
    }
}

/// How the request presented its access token.
enum Credential {
    Bearer(String),
    Cookie(String),
}

fn credential(parts: &Parts) -> Result<Option<Credential>, AppError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header.to_str().map_err(|_| unauthorized("Malformed Authorization header"))?;
        let token = value.strip_prefix("Bearer ").ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <token>")
        })?;
        return Ok(Some(Credential::Bearer(token.trim().to_string())));
    }
    Ok(read_cookie(&parts.headers, ACCESS_COOKIE).map(Credential::Cookie))
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Resolve the caller, or `None` when the request carries no credentials.
fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(credential) = credential(parts)? else {
        return Ok(None);
    };

    let token = match credential {
        Credential::Bearer(token) => token,
        Credential::Cookie(token) => {
            if !is_safe_method(&parts.method) {
                check_csrf(parts)?;
            }
            token
        }
    };

    let claims = validate_token(&token, &state.config.jwt)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    Ok(Some(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    }))
}

fn check_csrf(parts: &Parts) -> Result<(), AppError> {
    let cookie = read_cookie(&parts.headers, CSRF_COOKIE).unwrap_or_default();
    let header = parts
        .headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if tokens_match(&cookie, header) {
        Ok(())
    } else {
        tracing::warn!(method = %parts.method, uri = %parts.uri, "CSRF token missing or mismatched");
        Err(AppError::Core(CoreError::Forbidden(
            "Missing or invalid CSRF token".into(),
        )))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)?
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}

/// Caller if one is authenticated; anonymous otherwise.
///
/// Bad or incomplete credentials degrade to anonymous instead of rejecting,
/// for public endpoints that only personalise their behaviour.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(authenticate(parts, state).ok().flatten()))
    }
}

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }

    pub fn can_edit(&self) -> bool {
        self.0.as_ref().is_some_and(AuthUser::can_edit)
    }
}
