//! Handlers for the `/artists` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::pagination::Page;
use soundstage_core::subscription::validate_tier;
use soundstage_core::types::DbId;
use soundstage_db::models::artist::{Artist, ArtistFilter, CreateArtist, UpdateArtist};
use soundstage_db::repositories::ArtistRepo;
use validator::Validate;

use super::{not_found, resolve_patch_slug, resolve_slug};
use crate::error::AppResult;
use crate::middleware::rbac::RequireEditor;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/artists
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateArtist>,
) -> AppResult<(StatusCode, Json<DataResponse<Artist>>)> {
    input.validate()?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;

    let artist = ArtistRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(artist_id = artist.id, user_id = user.user_id, "Artist created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(artist))))
}

/// GET /api/artists
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ArtistFilter>,
) -> AppResult<Json<ListResponse<Artist>>> {
    if let Some(tier) = filter.tier.as_deref() {
        validate_tier(tier)?;
    }
    let page = Page::new(filter.limit, filter.offset);
    let artists = ArtistRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(artists.into()))
}

/// GET /api/artists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Artist>>> {
    let artist = ArtistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Artist", id))?;
    Ok(Json(DataResponse::new(artist)))
}

/// PUT /api/artists/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArtist>,
) -> AppResult<Json<DataResponse<Artist>>> {
    input.validate()?;
    let slug = resolve_patch_slug(input.slug.as_deref())?;

    let artist = ArtistRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or_else(|| not_found("Artist", id))?;
    Ok(Json(DataResponse::new(artist)))
}

/// DELETE /api/artists/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ArtistRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Artist", id));
    }
    tracing::info!(artist_id = id, user_id = user.user_id, "Artist deleted");
    Ok(StatusCode::NO_CONTENT)
}
