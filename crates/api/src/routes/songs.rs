//! Route definitions for the `/songs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{engagement, songs};
use crate::state::AppState;

/// Routes mounted at `/songs`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// POST   /{id}/like    -> like (requires auth)
/// DELETE /{id}/like    -> unlike (requires auth)
/// POST   /{id}/view    -> record a view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(songs::list).post(songs::create))
        .route(
            "/{id}",
            get(songs::get_by_id).put(songs::update).delete(songs::delete),
        )
        .route("/{id}/like", post(songs::like).delete(songs::unlike))
        .route("/{id}/view", post(engagement::song_view))
}
