//! Route definitions for the `/articles` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{articles, engagement};
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET    /             -> list (published only for non-editors)
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// POST   /{id}/view    -> record a view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(articles::list).post(articles::create))
        .route(
            "/{id}",
            get(articles::get_by_id)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route("/{id}/view", post(engagement::article_view))
}
