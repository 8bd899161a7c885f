//! Route definitions for the `/reports` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /              -> list (editor)
/// POST   /              -> create (requires auth)
/// GET    /{id}          -> get_by_id (editor)
/// DELETE /{id}          -> delete (editor)
/// PUT    /{id}/status   -> update_status (editor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list).post(reports::create))
        .route("/{id}", get(reports::get_by_id).delete(reports::delete))
        .route("/{id}/status", put(reports::update_status))
}
