//! Route definitions for the `/service-providers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::service_providers;
use crate::state::AppState;

/// Routes mounted at `/service-providers`.
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
        .route("/", get(service_providers::list).post(service_providers::create))
        .route(
            "/{id}",
            get(service_providers::get_by_id)
                .put(service_providers::update)
                .delete(service_providers::delete),
        )
}
