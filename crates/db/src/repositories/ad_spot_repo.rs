//! Repository for the `ad_spots` table.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::ad_spot::{AdSpot, AdSpotFilter, CreateAdSpot, UpdateAdSpot};
use crate::Paged;

const COLUMNS: &str =
    "id, code, name, page, description, is_active, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR code ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR page = $2) \
    AND ($3::bool IS NULL OR is_active = $3)";

/// Provides CRUD operations for ad placements.
pub struct AdSpotRepo;

impl AdSpotRepo {
    pub async fn create(pool: &PgPool, input: &CreateAdSpot) -> Result<AdSpot, sqlx::Error> {
        let query = format!(
            "INSERT INTO ad_spots (code, name, page, description, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdSpot>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.page)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdSpot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ad_spots WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, AdSpot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &AdSpotFilter,
        page: Page,
    ) -> Result<Paged<AdSpot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_spots WHERE {LIST_WHERE}
             ORDER BY code ASC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, AdSpot>(&query)
            .bind(&filter.q)
            .bind(&filter.page)
            .bind(filter.is_active)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM ad_spots WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(&filter.page)
            .bind(filter.is_active)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAdSpot,
    ) -> Result<Option<AdSpot>, sqlx::Error> {
        let query = format!(
            "UPDATE ad_spots SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                page = COALESCE($4, page),
                description = COALESCE($5, description),
                is_active = COALESCE($6, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdSpot>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.page)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an ad spot. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ad_spots SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
