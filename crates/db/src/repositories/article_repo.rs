//! Repository for the `articles` table.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::article::{Article, ArticleFilter, CreateArticle, UpdateArticle};
use crate::Paged;

const COLUMNS: &str = "id, title, slug, summary, body, cover_url, author_id, status, \
                        published_at, view_count, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%' OR summary ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR status = $2) \
    AND ($3::bigint IS NULL OR author_id = $3)";

/// Provides CRUD operations for news articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert an article. Publishing on create stamps `published_at`.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateArticle,
        slug: &str,
    ) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (title, slug, summary, body, cover_url, author_id, status, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7::text, 'draft'),
                     CASE WHEN $7 = 'published' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(&input.cover_url)
            .bind(author_id)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find an article by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List articles, most recently published first, drafts last.
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
        page: Page,
    ) -> Result<Paged<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles WHERE {LIST_WHERE}
             ORDER BY published_at DESC NULLS LAST, created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Article>(&query)
            .bind(&filter.q)
            .bind(&filter.status)
            .bind(filter.author_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM articles WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(&filter.status)
            .bind(filter.author_id)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Update an article. Moving to `published` stamps `published_at` the
    /// first time only.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
        slug: Option<&str>,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                summary = COALESCE($4, summary),
                body = COALESCE($5, body),
                cover_url = COALESCE($6, cover_url),
                status = COALESCE($7, status),
                published_at = CASE
                    WHEN COALESCE($7, status) = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(&input.cover_url)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an article. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE articles SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
