//! Route definitions for the `/playlists` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::playlists;
use crate::state::AppState;

/// Routes mounted at `/playlists`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create (requires auth)
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update (owner or editor)
/// DELETE /{id}                    -> delete (owner or editor)
/// GET    /{id}/songs              -> list_songs
/// POST   /{id}/songs              -> add_song (owner or editor)
/// DELETE /{id}/songs/{song_id}    -> remove_song (owner or editor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(playlists::list).post(playlists::create))
        .route(
            "/{id}",
            get(playlists::get_by_id)
                .put(playlists::update)
                .delete(playlists::delete),
        )
        .route(
            "/{id}/songs",
            get(playlists::list_songs).post(playlists::add_song),
        )
        .route("/{id}/songs/{song_id}", delete(playlists::remove_song))
}
