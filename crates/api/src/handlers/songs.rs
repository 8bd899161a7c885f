//! Handlers for the `/songs` resource, including likes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::error::CoreError;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::song::{CreateSong, LikeState, Song, SongFilter, UpdateSong};
use soundstage_db::repositories::{ArtistRepo, SongRepo};
use sqlx::PgPool;
use validator::Validate;

use super::{not_found, resolve_patch_slug, resolve_slug};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/songs
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateSong>,
) -> AppResult<(StatusCode, Json<DataResponse<Song>>)> {
    input.validate()?;
    ensure_artists_exist(&state.pool, &input.artist_ids).await?;
    let slug = resolve_slug(input.slug.as_deref(), &input.title)?;

    let song = SongRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(
        song_id = song.id,
        user_id = user.user_id,
        artists = song.artist_ids.len(),
        "Song created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(song))))
}

/// GET /api/songs
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<SongFilter>,
) -> AppResult<Json<ListResponse<Song>>> {
    let page = Page::new(filter.limit, filter.offset);
    let songs = SongRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(songs.into()))
}

/// GET /api/songs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Song>>> {
    let song = SongRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Song", id))?;
    Ok(Json(DataResponse::new(song)))
}

/// PUT /api/songs/{id}
///
/// `artist_ids`, when present, replaces the credits in the same transaction
/// as the field update.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSong>,
) -> AppResult<Json<DataResponse<Song>>> {
    input.validate()?;
    if let Some(artist_ids) = &input.artist_ids {
        ensure_artists_exist(&state.pool, artist_ids).await?;
    }
    let slug = resolve_patch_slug(input.slug.as_deref())?;

    let song = SongRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or_else(|| not_found("Song", id))?;
    Ok(Json(DataResponse::new(song)))
}

/// DELETE /api/songs/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SongRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Song", id));
    }
    tracing::info!(song_id = id, user_id = user.user_id, "Song deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/songs/{id}/like
pub async fn like(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeState>>> {
    let liked = SongRepo::like(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found("Song", id))?;
    Ok(Json(DataResponse::new(liked)))
}

/// DELETE /api/songs/{id}/like
pub async fn unlike(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeState>>> {
    let unliked = SongRepo::unlike(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found("Song", id))?;
    Ok(Json(DataResponse::new(unliked)))
}

/// Every credited artist must exist and not be soft-deleted.
async fn ensure_artists_exist(pool: &PgPool, artist_ids: &[DbId]) -> AppResult<()> {
    let mut distinct = artist_ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let found = ArtistRepo::count_existing(pool, &distinct).await?;
    if found != distinct.len() as i64 {
        return Err(AppError::Core(CoreError::Validation(
            "artist_ids references an unknown artist".into(),
        )));
    }
    Ok(())
}
