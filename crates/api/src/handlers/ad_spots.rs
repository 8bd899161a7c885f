//! Handlers for the `/ad-spots` resource plus slot availability and the
//! live campaign listing for a spot.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use soundstage_core::ad_slots::{availability, Availability, DateRange};
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::ad_campaign::{AdCampaign, AvailabilityQuery};
use soundstage_db::models::ad_spot::{AdSpot, AdSpotFilter, CreateAdSpot, UpdateAdSpot};
use soundstage_db::repositories::{AdCampaignRepo, AdSpotRepo};
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/ad-spots
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateAdSpot>,
) -> AppResult<(StatusCode, Json<DataResponse<AdSpot>>)> {
    input.validate()?;
    let spot = AdSpotRepo::create(&state.pool, &input).await?;
    tracing::info!(spot_id = spot.id, code = %spot.code, user_id = admin.user_id, "Ad spot created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(spot))))
}

/// GET /api/ad-spots
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AdSpotFilter>,
) -> AppResult<Json<ListResponse<AdSpot>>> {
    let page = Page::new(filter.limit, filter.offset);
    let spots = AdSpotRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(spots.into()))
}

/// GET /api/ad-spots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdSpot>>> {
    let spot = AdSpotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("AdSpot", id))?;
    Ok(Json(DataResponse::new(spot)))
}

/// PUT /api/ad-spots/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAdSpot>,
) -> AppResult<Json<DataResponse<AdSpot>>> {
    input.validate()?;
    let spot = AdSpotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("AdSpot", id))?;
    Ok(Json(DataResponse::new(spot)))
}

/// DELETE /api/ad-spots/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AdSpotRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("AdSpot", id));
    }
    tracing::info!(spot_id = id, user_id = admin.user_id, "Ad spot deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/ad-spots/{id}/campaigns/live
///
/// Campaigns running on the spot today, highest priority (lowest number) first.
pub async fn live_campaigns(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AdCampaign>>>> {
    AdSpotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("AdSpot", id))?;

    let today = Utc::now().date_naive();
    let campaigns = AdCampaignRepo::list_live(&state.pool, id, today).await?;
    Ok(Json(DataResponse::new(campaigns)))
}

/// GET /api/ad-spots/{id}/availability?start_date=&end_date=
pub async fn availability_for(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AvailabilityQuery>,
) -> AppResult<Json<DataResponse<Availability>>> {
    let range = DateRange::new(params.start_date, params.end_date)?;
    AdSpotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("AdSpot", id))?;

    let bookings = AdCampaignRepo::bookings(&state.pool, id, &range).await?;
    Ok(Json(DataResponse::new(availability(range, &bookings))))
}
