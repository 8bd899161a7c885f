//! Route definitions for the `/ad-campaigns` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{ad_campaigns, engagement};
use crate::state::AppState;

/// Routes mounted at `/ad-campaigns`.
///
/// ```text
/// GET    /             -> list (admin)
/// POST   /             -> create (admin)
/// GET    /{id}         -> get_by_id (admin)
/// PUT    /{id}         -> update (admin)
/// DELETE /{id}         -> delete (admin)
/// POST   /{id}/view    -> record an impression (public)
/// POST   /{id}/click   -> record a click (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ad_campaigns::list).post(ad_campaigns::create))
        .route(
            "/{id}",
            get(ad_campaigns::get_by_id)
                .put(ad_campaigns::update)
                .delete(ad_campaigns::delete),
        )
        .route("/{id}/view", post(engagement::ad_view))
        .route("/{id}/click", post(engagement::ad_click))
}
