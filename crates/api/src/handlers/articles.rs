//! Handlers for the `/articles` resource.
//!
//! Readers without an editor role only ever see published articles.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;
use soundstage_db::models::article::{
    Article, ArticleFilter, CreateArticle, UpdateArticle, ARTICLE_PUBLISHED, ARTICLE_STATUSES,
};
use soundstage_db::repositories::ArticleRepo;
use validator::Validate;

use super::{check_one_of, not_found, resolve_patch_slug, resolve_slug};
use crate::error::AppResult;
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/articles
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreateArticle>,
) -> AppResult<(StatusCode, Json<DataResponse<Article>>)> {
    input.validate()?;
    if let Some(status) = input.status.as_deref() {
        check_one_of("status", status, ARTICLE_STATUSES)?;
    }
    let slug = resolve_slug(input.slug.as_deref(), &input.title)?;

    let article = ArticleRepo::create(&state.pool, user.user_id, &input, &slug).await?;
    tracing::info!(
        article_id = article.id,
        author_id = user.user_id,
        status = %article.status,
        "Article created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(article))))
}

/// GET /api/articles
pub async fn list(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Query(mut filter): Query<ArticleFilter>,
) -> AppResult<Json<ListResponse<Article>>> {
    if !viewer.can_edit() {
        filter.status = Some(ARTICLE_PUBLISHED.to_string());
    } else if let Some(status) = filter.status.as_deref() {
        check_one_of("status", status, ARTICLE_STATUSES)?;
    }
    let page = Page::new(filter.limit, filter.offset);
    let articles = ArticleRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(articles.into()))
}

/// GET /api/articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Article>>> {
    let article = ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|a| viewer.can_edit() || a.status == ARTICLE_PUBLISHED)
        .ok_or_else(|| not_found("Article", id))?;
    Ok(Json(DataResponse::new(article)))
}

/// PUT /api/articles/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArticle>,
) -> AppResult<Json<DataResponse<Article>>> {
    input.validate()?;
    if let Some(status) = input.status.as_deref() {
        check_one_of("status", status, ARTICLE_STATUSES)?;
    }
    let slug = resolve_patch_slug(input.slug.as_deref())?;

    let article = ArticleRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or_else(|| not_found("Article", id))?;
    Ok(Json(DataResponse::new(article)))
}

/// DELETE /api/articles/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ArticleRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found("Article", id));
    }
    tracing::info!(article_id = id, user_id = user.user_id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}
