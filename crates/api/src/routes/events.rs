//! Route definitions for the `/events` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{engagement, events};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// POST   /{id}/view    -> record a view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route(
            "/{id}",
            get(events::get_by_id).put(events::update).delete(events::delete),
        )
        .route("/{id}/view", post(engagement::event_view))
}
