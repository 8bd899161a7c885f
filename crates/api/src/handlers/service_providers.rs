//! Handlers for the `/service-providers` directory.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::pagination::Page;
use soundstage_core::subscription::validate_tier;
use soundstage_core::types::DbId;
use soundstage_db::models::service_provider::{
    CreateServiceProvider, ServiceProvider, ServiceProviderFilter, UpdateServiceProvider,
    PROVIDER_KINDS,
};
use soundstage_db::repositories::ServiceProviderRepo;
use validator::Validate;

use super::{check_one_of, not_found, resolve_patch_slug, resolve_slug};
use crate::error::AppResult;
use crate::middleware::rbac::RequireEditor;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/service-providers
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateServiceProvider>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceProvider>>)> {
    input.validate()?;
    if let Some(kind) = input.kind.as_deref() {
        check_one_of("kind", kind, PROVIDER_KINDS)?;
    }
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;

    let provider = ServiceProviderRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(
        provider_id = provider.id,
        kind = %provider.kind,
        user_id = user.user_id,
        "Service provider created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(provider))))
}

/// GET /api/service-providers
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ServiceProviderFilter>,
) -> AppResult<Json<ListResponse<ServiceProvider>>> {
    if let Some(kind) = filter.kind.as_deref() {
        check_one_of("kind", kind, PROVIDER_KINDS)?;
    }
    if let Some(tier) = filter.tier.as_deref() {
        validate_tier(tier)?;
    }
    let page = Page::new(filter.limit, filter.offset);
    let providers = ServiceProviderRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(providers.into()))
}

/// GET /api/service-providers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ServiceProvider>>> {
    let provider = ServiceProviderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("ServiceProvider", id))?;
    Ok(Json(DataResponse::new(provider)))
}

/// PUT /api/service-providers/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServiceProvider>,
) -> AppResult<Json<DataResponse<ServiceProvider>>> {
    input.validate()?;
    if let Some(kind) = input.kind.as_deref() {
        check_one_of("kind", kind, PROVIDER_KINDS)?;
    }
    let slug = resolve_patch_slug(input.slug.as_deref())?;

    let provider = ServiceProviderRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or_else(|| not_found("ServiceProvider", id))?;
    Ok(Json(DataResponse::new(provider)))
}

/// DELETE /api/service-providers/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ServiceProviderRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("ServiceProvider", id));
    }
    tracing::info!(provider_id = id, user_id = user.user_id, "Service provider deleted");
    Ok(StatusCode::NO_CONTENT)
}
