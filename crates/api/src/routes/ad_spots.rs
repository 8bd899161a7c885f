//! Route definitions for the `/ad-spots` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::ad_spots;
use crate::state::AppState;

/// Routes mounted at `/ad-spots`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create (admin)
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update (admin)
/// DELETE /{id}                 -> delete (admin)
/// GET    /{id}/campaigns/live  -> campaigns running today
/// GET    /{id}/availability    -> free priorities and capacity for a range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ad_spots::list).post(ad_spots::create))
        .route(
            "/{id}",
            get(ad_spots::get_by_id)
                .put(ad_spots::update)
                .delete(ad_spots::delete),
        )
        .route("/{id}/campaigns/live", get(ad_spots::live_campaigns))
        .route("/{id}/availability", get(ad_spots::availability_for))
}
