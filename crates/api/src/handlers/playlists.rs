//! Handlers for `/playlists` and their ordered song lists.
//!
//! Public playlists are readable by anyone. Private ones read as missing to
//! everyone except the owner and editors. Only the owner or an editor may
//! change a playlist.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::error::CoreError;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::playlist::{
    AddPlaylistSong, CreatePlaylist, Playlist, PlaylistEntry, PlaylistFilter, UpdatePlaylist,
};
use soundstage_db::repositories::{PlaylistRepo, SongRepo};
use sqlx::PgPool;
use validator::Validate;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/playlists
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePlaylist>,
) -> AppResult<(StatusCode, Json<DataResponse<Playlist>>)> {
    input.validate()?;
    let playlist = PlaylistRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(playlist_id = playlist.id, owner_id = user.user_id, "Playlist created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(playlist))))
}

/// GET /api/playlists
pub async fn list(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Query(filter): Query<PlaylistFilter>,
) -> AppResult<Json<ListResponse<Playlist>>> {
    let page = Page::new(filter.limit, filter.offset);
    let playlists =
        PlaylistRepo::list(&state.pool, &filter, viewer.user_id(), viewer.can_edit(), page)
            .await?;
    Ok(Json(playlists.into()))
}

/// GET /api/playlists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Playlist>>> {
    let playlist = load_visible(&state.pool, &viewer, id).await?;
    Ok(Json(DataResponse::new(playlist)))
}

/// PUT /api/playlists/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlaylist>,
) -> AppResult<Json<DataResponse<Playlist>>> {
    input.validate()?;
    load_editable(&state.pool, &user, id).await?;
    let playlist = PlaylistRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Playlist", id))?;
    Ok(Json(DataResponse::new(playlist)))
}

/// DELETE /api/playlists/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_editable(&state.pool, &user, id).await?;
    if !PlaylistRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Playlist", id));
    }
    tracing::info!(playlist_id = id, user_id = user.user_id, "Playlist deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/playlists/{id}/songs
pub async fn list_songs(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PlaylistEntry>>>> {
    load_visible(&state.pool, &viewer, id).await?;
    let entries = PlaylistRepo::list_songs(&state.pool, id).await?;
    Ok(Json(DataResponse::new(entries)))
}

/// POST /api/playlists/{id}/songs
///
/// Returns the playlist in its new order.
pub async fn add_song(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddPlaylistSong>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<PlaylistEntry>>>)> {
    load_editable(&state.pool, &user, id).await?;
    SongRepo::find_by_id(&state.pool, input.song_id)
        .await?
        .ok_or_else(|| not_found("Song", input.song_id))?;

    if !PlaylistRepo::add_song(&state.pool, id, input.song_id, input.position).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Song is already on this playlist".into(),
        )));
    }
    let entries = PlaylistRepo::list_songs(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(entries))))
}

/// DELETE /api/playlists/{id}/songs/{song_id}
pub async fn remove_song(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, song_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_editable(&state.pool, &user, id).await?;
    if !PlaylistRepo::remove_song(&state.pool, id, song_id).await? {
        return Err(not_found("PlaylistSong", song_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn load_visible(pool: &PgPool, viewer: &OptionalAuthUser, id: DbId) -> AppResult<Playlist> {
    PlaylistRepo::find_by_id(pool, id)
        .await?
        .filter(|p| p.is_public || viewer.can_edit() || viewer.user_id() == Some(p.owner_id))
        .ok_or_else(|| not_found("Playlist", id))
}

/// Load a playlist for mutation. Readable-but-foreign playlists are 403.
async fn load_editable(pool: &PgPool, user: &AuthUser, id: DbId) -> AppResult<Playlist> {
    let viewer = OptionalAuthUser(Some(user.clone()));
    let playlist = load_visible(pool, &viewer, id).await?;
    if playlist.owner_id != user.user_id && !user.can_edit() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an editor may change this playlist".into(),
        )));
    }
    Ok(playlist)
}
