//! Route definitions for the `/subscriptions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`. All require auth.
///
/// ```text
/// GET    /                -> list (own, or all for staff)
/// POST   /                -> create
/// GET    /me              -> caller's current subscription
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update (auto_renew)
/// DELETE /{id}            -> delete (admin)
/// POST   /{id}/activate   -> activate
/// POST   /{id}/upgrade    -> upgrade
/// POST   /{id}/cancel     -> cancel
/// POST   /{id}/renew      -> renew
/// POST   /{id}/suspend    -> suspend (admin)
/// POST   /{id}/resume     -> resume (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subscriptions::list).post(subscriptions::create))
        .route("/me", get(subscriptions::me))
        .route(
            "/{id}",
            get(subscriptions::get_by_id)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        )
        .route("/{id}/activate", post(subscriptions::activate))
        .route("/{id}/upgrade", post(subscriptions::upgrade))
        .route("/{id}/cancel", post(subscriptions::cancel))
        .route("/{id}/renew", post(subscriptions::renew))
        .route("/{id}/suspend", post(subscriptions::suspend))
        .route("/{id}/resume", post(subscriptions::resume))
}
