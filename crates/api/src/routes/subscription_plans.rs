//! Route definitions for the `/subscription-plans` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::subscription_plans;
use crate::state::AppState;

/// Routes mounted at `/subscription-plans`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subscription_plans::list).post(subscription_plans::create))
        .route(
            "/{id}",
            get(subscription_plans::get_by_id)
                .put(subscription_plans::update)
                .delete(subscription_plans::delete),
        )
}
