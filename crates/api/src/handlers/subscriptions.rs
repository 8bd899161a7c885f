//! Handlers for `/subscriptions` and the lifecycle actions.
//!
//! Status moves are computed by `soundstage_core::subscription` and applied
//! with a compare-and-set on the previous status, so two racing actions on
//! one subscription cannot both land.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use soundstage_core::error::CoreError;
use soundstage_core::pagination::Page;
use soundstage_core::subscription::{
    self, Transition, STATUS_ACTIVE, STATUS_CANCELLED, STATUS_SUSPENDED,
};
use soundstage_core::types::DbId;
use soundstage_db::models::subscription::{
    CreateSubscription, ExpirySweep, Subscription, SubscriptionFilter, SubscriptionPlan,
    UpdateSubscription, UpgradeSubscription,
};
use soundstage_db::repositories::{SubscriptionPlanRepo, SubscriptionRepo, UserRepo};
use sqlx::PgPool;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/subscriptions
///
/// Staff may subscribe another user by passing `user_id`.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSubscription>,
) -> AppResult<(StatusCode, Json<DataResponse<Subscription>>)> {
    let subscriber_id = match input.user_id {
        Some(id) if user.can_edit() => id,
        _ => user.user_id,
    };
    if subscriber_id != user.user_id {
        UserRepo::find_by_id(&state.pool, subscriber_id)
            .await?
            .ok_or_else(|| not_found("User", subscriber_id))?;
    }

    let plan = active_plan(&state.pool, input.plan_id).await?;
    if SubscriptionRepo::find_current_for_user(&state.pool, subscriber_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "User already has a current subscription".into(),
        )));
    }

    let initial = subscription::initial(input.start_trial, plan.trial_days, Utc::now());
    let created = SubscriptionRepo::create(
        &state.pool,
        subscriber_id,
        plan.id,
        input.auto_renew.unwrap_or(true),
        &initial,
    )
    .await?;

    tracing::info!(
        subscription_id = created.id,
        subscriber_id,
        plan_id = plan.id,
        status = %created.status,
        "Subscription created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/subscriptions
///
/// Non-staff callers only ever see their own subscriptions.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(mut filter): Query<SubscriptionFilter>,
) -> AppResult<Json<ListResponse<Subscription>>> {
    if !user.can_edit() {
        filter.user_id = Some(user.user_id);
    }
    if let Some(status) = filter.status.as_deref() {
        subscription::validate_status(status)?;
    }
    let page = Page::new(filter.limit, filter.offset);
    let subscriptions = SubscriptionRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(subscriptions.into()))
}

/// GET /api/subscriptions/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Option<Subscription>>>> {
    let current = SubscriptionRepo::find_current_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(current)))
}

/// GET /api/subscriptions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let found = load_visible(&state.pool, &user, id).await?;
    Ok(Json(DataResponse::new(found)))
}

/// PUT /api/subscriptions/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubscription>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    load_visible(&state.pool, &user, id).await?;
    let updated = SubscriptionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Subscription", id))?;
    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /api/subscriptions/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SubscriptionRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Subscription", id));
    }
    tracing::info!(subscription_id = id, user_id = admin.user_id, "Subscription deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle actions
// ---------------------------------------------------------------------------

/// POST /api/subscriptions/{id}/activate
pub async fn activate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = load_visible(&state.pool, &user, id).await?;
    let plan = plan_of(&state.pool, current.plan_id).await?;
    let transition = subscription::activate(&current.status, plan.duration_days, Utc::now())?;
    apply(&state.pool, &current, None, &transition, "activate").await
}

/// POST /api/subscriptions/{id}/upgrade
pub async fn upgrade(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpgradeSubscription>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = load_visible(&state.pool, &user, id).await?;
    if input.plan_id == current.plan_id {
        return Err(AppError::Core(CoreError::Validation(
            "Subscription is already on this plan".into(),
        )));
    }
    let plan = active_plan(&state.pool, input.plan_id).await?;
    let transition = subscription::upgrade(&current.status, plan.duration_days, Utc::now())?;
    apply(&state.pool, &current, Some(plan.id), &transition, "upgrade").await
}

/// POST /api/subscriptions/{id}/cancel
///
/// The tier is kept until the paid period runs out and the expiry sweep
/// picks the row up.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = load_visible(&state.pool, &user, id).await?;
    let transition = subscription::move_to(&current.status, STATUS_CANCELLED)?;
    apply(&state.pool, &current, None, &transition, "cancel").await
}

/// POST /api/subscriptions/{id}/renew
pub async fn renew(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = load_visible(&state.pool, &user, id).await?;
    let plan = plan_of(&state.pool, current.plan_id).await?;
    let transition = subscription::renew(
        &current.status,
        current.end_date,
        plan.duration_days,
        Utc::now(),
    )?;
    apply(&state.pool, &current, None, &transition, "renew").await
}

/// POST /api/subscriptions/{id}/suspend
pub async fn suspend(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = SubscriptionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Subscription", id))?;
    let transition = subscription::move_to(&current.status, STATUS_SUSPENDED)?;
    apply(&state.pool, &current, None, &transition, "suspend").await
}

/// POST /api/subscriptions/{id}/resume
pub async fn resume(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let current = SubscriptionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Subscription", id))?;
    if current.status != STATUS_SUSPENDED {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Only suspended subscriptions can be resumed (status is '{}')",
            current.status
        ))));
    }
    let transition = subscription::move_to(&current.status, STATUS_ACTIVE)?;
    apply(&state.pool, &current, None, &transition, "resume").await
}

/// POST /api/admin/subscriptions/expire-due
pub async fn expire_due(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<ExpirySweep>>> {
    let sweep = SubscriptionRepo::expire_due(&state.pool, Utc::now()).await?;
    tracing::info!(expired = sweep.expired, user_id = admin.user_id, "Expiry sweep finished");
    Ok(Json(DataResponse::new(sweep)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a subscription the caller may see: their own, or any for staff.
/// Someone else's subscription reads as missing.
async fn load_visible(pool: &PgPool, user: &AuthUser, id: DbId) -> AppResult<Subscription> {
    SubscriptionRepo::find_by_id(pool, id)
        .await?
        .filter(|s| s.user_id == user.user_id || user.can_edit())
        .ok_or_else(|| not_found("Subscription", id))
}

async fn plan_of(pool: &PgPool, plan_id: DbId) -> AppResult<SubscriptionPlan> {
    SubscriptionPlanRepo::find_by_id(pool, plan_id)
        .await?
        .ok_or_else(|| not_found("SubscriptionPlan", plan_id))
}

/// A plan that new subscriptions and upgrades may target.
async fn active_plan(pool: &PgPool, plan_id: DbId) -> AppResult<SubscriptionPlan> {
    let plan = plan_of(pool, plan_id).await?;
    if !plan.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Plan '{}' is not open for subscription",
            plan.code
        ))));
    }
    Ok(plan)
}

async fn apply(
    pool: &PgPool,
    current: &Subscription,
    plan_id: Option<DbId>,
    transition: &Transition,
    action: &'static str,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let updated =
        SubscriptionRepo::apply_transition(pool, current.id, &current.status, plan_id, transition)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Subscription was modified concurrently; reload and retry".into(),
                ))
            })?;

    tracing::info!(
        subscription_id = updated.id,
        action,
        from = %current.status,
        to = %updated.status,
        tier = ?transition.tier,
        "Subscription transition applied"
    );
    Ok(Json(DataResponse::new(updated)))
}
