//! Handlers for the `/clients` resource (advertisers). Admin only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::client::{Client, ClientFilter, CreateClient, UpdateClient};
use soundstage_db::repositories::ClientRepo;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/clients
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    input.validate()?;
    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, user_id = admin.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(client))))
}

/// GET /api/clients
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<ClientFilter>,
) -> AppResult<Json<ListResponse<Client>>> {
    let page = Page::new(filter.limit, filter.offset);
    let clients = ClientRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(clients.into()))
}

/// GET /api/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Client", id))?;
    Ok(Json(DataResponse::new(client)))
}

/// PUT /api/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    input.validate()?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Client", id))?;
    Ok(Json(DataResponse::new(client)))
}

/// DELETE /api/clients/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ClientRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Client", id));
    }
    tracing::info!(client_id = id, user_id = admin.user_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
