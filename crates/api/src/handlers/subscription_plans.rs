//! Handlers for the `/subscription-plans` resource.
//!
//! Anyone can browse plans; only admins change them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::subscription::{
    CreateSubscriptionPlan, SubscriptionPlan, SubscriptionPlanFilter, UpdateSubscriptionPlan,
};
use soundstage_db::repositories::SubscriptionPlanRepo;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/subscription-plans
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateSubscriptionPlan>,
) -> AppResult<(StatusCode, Json<DataResponse<SubscriptionPlan>>)> {
    input.validate()?;
    let plan = SubscriptionPlanRepo::create(&state.pool, &input).await?;
    tracing::info!(plan_id = plan.id, code = %plan.code, user_id = admin.user_id, "Plan created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(plan))))
}

/// GET /api/subscription-plans
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<SubscriptionPlanFilter>,
) -> AppResult<Json<ListResponse<SubscriptionPlan>>> {
    let page = Page::new(filter.limit, filter.offset);
    let plans = SubscriptionPlanRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(plans.into()))
}

/// GET /api/subscription-plans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubscriptionPlan>>> {
    let plan = SubscriptionPlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("SubscriptionPlan", id))?;
    Ok(Json(DataResponse::new(plan)))
}

/// PUT /api/subscription-plans/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubscriptionPlan>,
) -> AppResult<Json<DataResponse<SubscriptionPlan>>> {
    input.validate()?;
    let plan = SubscriptionPlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("SubscriptionPlan", id))?;
    Ok(Json(DataResponse::new(plan)))
}

/// DELETE /api/subscription-plans/{id}
///
/// Existing subscriptions keep pointing at the deleted plan.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SubscriptionPlanRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("SubscriptionPlan", id));
    }
    tracing::info!(plan_id = id, user_id = admin.user_id, "Plan deleted");
    Ok(StatusCode::NO_CONTENT)
}
