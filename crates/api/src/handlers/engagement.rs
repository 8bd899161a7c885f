//! View/click recording and the admin analytics summary.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Serialize;
use soundstage_core::engagement::{EventKind, RecordOutcome, TargetKind, ViewerKey};
use soundstage_core::types::{DbId, Timestamp};
use soundstage_db::models::engagement::{AnalyticsSummaryQuery, EngagementTotal, TopTarget};
use soundstage_db::repositories::EngagementRepo;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::client::ClientMeta;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_SUMMARY_DAYS: i64 = 30;
const MAX_SUMMARY_DAYS: i64 = 365;
const TOP_TARGETS: i64 = 20;

/// POST /api/songs/{id}/view
pub async fn song_view(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    meta: ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecordOutcome>>> {
    record(&state, &viewer, &meta, TargetKind::Song, id, EventKind::View).await
}

/// POST /api/articles/{id}/view
pub async fn article_view(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    meta: ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecordOutcome>>> {
    record(&state, &viewer, &meta, TargetKind::Article, id, EventKind::View).await
}

/// POST /api/events/{id}/view
pub async fn event_view(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    meta: ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecordOutcome>>> {
    record(&state, &viewer, &meta, TargetKind::Event, id, EventKind::View).await
}

/// POST /api/ad-campaigns/{id}/view
pub async fn ad_view(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    meta: ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecordOutcome>>> {
    record(&state, &viewer, &meta, TargetKind::AdCampaign, id, EventKind::View).await
}

/// POST /api/ad-campaigns/{id}/click
pub async fn ad_click(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    meta: ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecordOutcome>>> {
    record(&state, &viewer, &meta, TargetKind::AdCampaign, id, EventKind::Click).await
}

async fn record(
    state: &AppState,
    viewer: &OptionalAuthUser,
    meta: &ClientMeta,
    target: TargetKind,
    id: DbId,
    kind: EventKind,
) -> AppResult<Json<DataResponse<RecordOutcome>>> {
    target.counter_column(kind)?;
    let key = ViewerKey::resolve(
        viewer.user_id(),
        meta.ip.as_deref(),
        meta.user_agent.as_deref(),
    );

    let outcome = EngagementRepo::record(&state.pool, target, id, kind, &key, Utc::now())
        .await?
        .ok_or_else(|| not_found(target.as_str(), id))?;

    tracing::debug!(
        target = target.as_str(),
        target_id = id,
        kind = kind.as_str(),
        counted = outcome.counted,
        "Engagement recorded"
    );
    Ok(Json(DataResponse::new(outcome)))
}

/// Body of the analytics summary.
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub days: i64,
    pub since: Timestamp,
    pub totals: Vec<EngagementTotal>,
    pub top_targets: Vec<TopTarget>,
}

/// GET /api/admin/analytics/summary?days=
///
/// `days` defaults to 30 and is clamped to `[1, 365]`.
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AnalyticsSummaryQuery>,
) -> AppResult<Json<DataResponse<AnalyticsSummary>>> {
    let days = params
        .days
        .unwrap_or(DEFAULT_SUMMARY_DAYS)
        .clamp(1, MAX_SUMMARY_DAYS);
    let since = Utc::now() - Duration::days(days);

    let totals = EngagementRepo::totals_since(&state.pool, since).await?;
    let top_targets = EngagementRepo::top_targets_since(&state.pool, since, TOP_TARGETS).await?;

    Ok(Json(DataResponse::new(AnalyticsSummary {
        days,
        since,
        totals,
        top_targets,
    })))
}
