//! Handlers for the `/events` resource (live shows).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::error::CoreError;
use soundstage_core::pagination::Page;
use soundstage_core::types::{DbId, Timestamp};
use soundstage_db::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use soundstage_db::repositories::EventRepo;
use validator::Validate;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

fn check_schedule(starts_at: Timestamp, ends_at: Option<Timestamp>) -> AppResult<()> {
    match ends_at {
        Some(end) if end < starts_at => Err(AppError::Core(CoreError::Validation(
            "ends_at must not be before starts_at".into(),
        ))),
        _ => Ok(()),
    }
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    input.validate()?;
    check_schedule(input.starts_at, input.ends_at)?;

    let event = EventRepo::create(&state.pool, &input).await?;
    tracing::info!(event_id = event.id, user_id = user.user_id, "Event created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(event))))
}

/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<ListResponse<Event>>> {
    let page = Page::new(filter.limit, filter.offset);
    let events = EventRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(events.into()))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Event", id))?;
    Ok(Json(DataResponse::new(event)))
}

/// PUT /api/events/{id}
///
/// The schedule is checked against the merged row so moving only one end
/// of the window cannot invert it.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<Event>>> {
    input.validate()?;
    let current = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Event", id))?;
    check_schedule(
        input.starts_at.unwrap_or(current.starts_at),
        input.ends_at.or(current.ends_at),
    )?;

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Event", id))?;
    Ok(Json(DataResponse::new(event)))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EventRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Event", id));
    }
    tracing::info!(event_id = id, user_id = user.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}
