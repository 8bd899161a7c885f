//! Handlers for the `/ad-campaigns` resource. Admin only.
//!
//! Slot conflicts surface from the repository as `PlacementError` and map
//! to 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::ad_slots::validate_status;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::ad_campaign::{
    AdCampaign, AdCampaignFilter, CreateAdCampaign, UpdateAdCampaign,
};
use soundstage_db::repositories::AdCampaignRepo;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/ad-campaigns
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateAdCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<AdCampaign>>)> {
    input.validate()?;
    let campaign = AdCampaignRepo::create(&state.pool, &input).await?;
    tracing::info!(
        campaign_id = campaign.id,
        spot_id = campaign.spot_id,
        priority = campaign.priority,
        status = %campaign.status,
        user_id = admin.user_id,
        "Ad campaign created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(campaign))))
}

/// GET /api/ad-campaigns
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<AdCampaignFilter>,
) -> AppResult<Json<ListResponse<AdCampaign>>> {
    if let Some(status) = filter.status.as_deref() {
        validate_status(status)?;
    }
    let page = Page::new(filter.limit, filter.offset);
    let campaigns = AdCampaignRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(campaigns.into()))
}

/// GET /api/ad-campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdCampaign>>> {
    let campaign = AdCampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("AdCampaign", id))?;
    Ok(Json(DataResponse::new(campaign)))
}

/// PUT /api/ad-campaigns/{id}
///
/// Moving the window, the priority, the spot, or switching to `active`
/// re-runs the slot check against the merged row.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAdCampaign>,
) -> AppResult<Json<DataResponse<AdCampaign>>> {
    input.validate()?;
    let campaign = AdCampaignRepo::update(&state.pool, id, &input).await?;
    tracing::info!(
        campaign_id = campaign.id,
        status = %campaign.status,
        user_id = admin.user_id,
        "Ad campaign updated"
    );
    Ok(Json(DataResponse::new(campaign)))
}

/// DELETE /api/ad-campaigns/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AdCampaignRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("AdCampaign", id));
    }
    tracing::info!(campaign_id = id, user_id = admin.user_id, "Ad campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}
