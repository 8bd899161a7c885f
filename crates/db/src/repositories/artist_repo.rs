//! Repository for the `artists` table.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::artist::{Artist, ArtistFilter, CreateArtist, UpdateArtist};
use super::owner_tier_expr;
use crate::Paged;

const COLUMNS: &str = "id, name, slug, bio, country, image_url, user_id, tier, \
                        deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR tier = $2) \
    AND ($3::text IS NULL OR country = $3)";

/// Provides CRUD operations for artist profiles.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert a new artist with an already-normalised slug.
    ///
    /// The tier starts from the owner's current subscription.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArtist,
        slug: &str,
    ) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (name, slug, bio, country, image_url, user_id, tier)
             VALUES ($1, $2, $3, $4, $5, $6, {tier})
             RETURNING {COLUMNS}",
            tier = owner_tier_expr("$6"),
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.bio)
            .bind(&input.country)
            .bind(&input.image_url)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an artist by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// How many of `ids` are live artists.
    pub async fn count_existing(pool: &PgPool, ids: &[DbId]) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM artists WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_one(pool)
        .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &ArtistFilter,
        page: Page,
    ) -> Result<Paged<Artist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artists WHERE {LIST_WHERE}
             ORDER BY name ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Artist>(&query)
            .bind(&filter.q)
            .bind(&filter.tier)
            .bind(&filter.country)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM artists WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(&filter.tier)
            .bind(&filter.country)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Update an artist. Only non-`None` fields are applied. Linking a
    /// `user_id` re-derives `tier` from that owner's subscription.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArtist,
        slug: Option<&str>,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                bio = COALESCE($4, bio),
                country = COALESCE($5, country),
                image_url = COALESCE($6, image_url),
                user_id = COALESCE($7, user_id),
                tier = CASE WHEN $7::bigint IS NULL THEN tier ELSE {tier} END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}",
            tier = owner_tier_expr("$7"),
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.bio)
            .bind(&input.country)
            .bind(&input.image_url)
            .bind(input.user_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an artist. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE artists SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
