//! Handlers for moderation `/reports`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::error::CoreError;
use soundstage_core::moderation;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::report::{CreateReport, Report, ReportFilter, UpdateReportStatus};
use soundstage_db::repositories::ReportRepo;
use validator::Validate;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/reports
///
/// The target must exist. A second open report from the same user on the
/// same target is a 409 via `uq_reports_open_per_reporter`.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateReport>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    input.validate()?;
    let table = moderation::target_table(&input.entity_type)?;
    if !ReportRepo::target_exists(&state.pool, table, input.entity_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: table,
            id: input.entity_id,
        }));
    }

    let report = ReportRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(
        report_id = report.id,
        entity_type = %report.entity_type,
        entity_id = report.entity_id,
        reporter_id = user.user_id,
        "Report filed"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(report))))
}

/// GET /api/reports
pub async fn list(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<ListResponse<Report>>> {
    if let Some(status) = filter.status.as_deref() {
        moderation::validate_status(status)?;
    }
    let page = Page::new(filter.limit, filter.offset);
    let reports = ReportRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(reports.into()))
}

/// GET /api/reports/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Report", id))?;
    Ok(Json(DataResponse::new(report)))
}

/// PUT /api/reports/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireEditor(moderator): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReportStatus>,
) -> AppResult<Json<DataResponse<Report>>> {
    input.validate()?;
    moderation::validate_status(&input.status)?;

    let current = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Report", id))?;
    moderation::validate_transition(&current.status, &input.status)?;

    let report = ReportRepo::update_status(
        &state.pool,
        id,
        &current.status,
        &input,
        moderator.user_id,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Report was modified concurrently; reload and retry".into(),
        ))
    })?;

    tracing::info!(
        report_id = id,
        from = %current.status,
        to = %report.status,
        moderator_id = moderator.user_id,
        "Report status changed"
    );
    Ok(Json(DataResponse::new(report)))
}

/// DELETE /api/reports/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ReportRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Report", id));
    }
    tracing::info!(report_id = id, user_id = user.user_id, "Report deleted");
    Ok(StatusCode::NO_CONTENT)
}
