//! Article (news) model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

pub const ARTICLE_DRAFT: &str = "draft";
pub const ARTICLE_PUBLISHED: &str = "published";
pub const ARTICLE_ARCHIVED: &str = "archived";

/// All valid article statuses.
pub const ARTICLE_STATUSES: &[&str] = &[ARTICLE_DRAFT, ARTICLE_PUBLISHED, ARTICLE_ARCHIVED];

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
    pub cover_url: Option<String>,
    pub author_id: Option<DbId>,
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub view_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an article. The author is the calling user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArticle {
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub summary: Option<String>,
    #[serde(default)]
    pub body: String,
    pub cover_url: Option<String>,
    pub status: Option<String>,
}

/// DTO for partially updating an article.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArticle {
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub summary: Option<String>,
    pub body: Option<String>,
    pub cover_url: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for `GET /articles`.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleFilter {
    pub q: Option<String>,
    pub status: Option<String>,
    pub author_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
