//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin_users, engagement, subscriptions};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                        -> list_users
/// POST   /users                        -> create_user
/// GET    /users/{id}                   -> get_user
/// PUT    /users/{id}                   -> update_user
/// DELETE /users/{id}                   -> deactivate_user
/// POST   /users/{id}/reset-password    -> reset_password
/// POST   /subscriptions/expire-due     -> expiry sweep
/// GET    /analytics/summary            -> engagement summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(admin_users::list_users).post(admin_users::create_user),
        )
        .route(
            "/users/{id}",
            get(admin_users::get_user)
                .put(admin_users::update_user)
                .delete(admin_users::deactivate_user),
        )
        .route("/users/{id}/reset-password", post(admin_users::reset_password))
        .route("/subscriptions/expire-due", post(subscriptions::expire_due))
        .route("/analytics/summary", get(engagement::summary))
}
