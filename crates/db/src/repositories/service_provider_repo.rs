//! Repository for the `service_providers` directory.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::service_provider::{
    CreateServiceProvider, ServiceProvider, ServiceProviderFilter, UpdateServiceProvider,
};
use super::owner_tier_expr;
use crate::Paged;

const COLUMNS: &str = "id, name, slug, kind, bio, instruments, city, hourly_rate_cents, \
                        contact_email, user_id, tier, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR bio ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR kind = $2) \
    AND ($3::text IS NULL OR city ILIKE $3) \
    AND ($4::text IS NULL OR $4 = ANY(instruments)) \
    AND ($5::text IS NULL OR tier = $5)";

/// Provides CRUD operations for teachers, studios and producers.
pub struct ServiceProviderRepo;

impl ServiceProviderRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateServiceProvider,
        slug: &str,
    ) -> Result<ServiceProvider, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_providers
                (name, slug, kind, bio, instruments, city, hourly_rate_cents, contact_email,
                 user_id, tier)
             VALUES ($1, $2, COALESCE($3::text, 'teacher'), $4, $5, $6, $7, $8, $9, {tier})
             RETURNING {COLUMNS}",
            tier = owner_tier_expr("$9"),
        );
        sqlx::query_as::<_, ServiceProvider>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.kind)
            .bind(&input.bio)
            .bind(&input.instruments)
            .bind(&input.city)
            .bind(input.hourly_rate_cents)
            .bind(&input.contact_email)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a provider by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceProvider>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM service_providers WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ServiceProvider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List providers. Subscribed profiles rank first.
    pub async fn list(
        pool: &PgPool,
        filter: &ServiceProviderFilter,
        page: Page,
    ) -> Result<Paged<ServiceProvider>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_providers WHERE {LIST_WHERE}
             ORDER BY (tier = 'subscribed') DESC, name ASC, id ASC
             LIMIT $6 OFFSET $7"
        );
        let items = sqlx::query_as::<_, ServiceProvider>(&query)
            .bind(&filter.q)
            .bind(&filter.kind)
            .bind(&filter.city)
            .bind(&filter.instrument)
            .bind(&filter.tier)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM service_providers WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(&filter.kind)
            .bind(&filter.city)
            .bind(&filter.instrument)
            .bind(&filter.tier)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServiceProvider,
        slug: Option<&str>,
    ) -> Result<Option<ServiceProvider>, sqlx::Error> {
        let query = format!(
            "UPDATE service_providers SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                kind = COALESCE($4, kind),
                bio = COALESCE($5, bio),
                instruments = COALESCE($6, instruments),
                city = COALESCE($7, city),
                hourly_rate_cents = COALESCE($8, hourly_rate_cents),
                contact_email = COALESCE($9, contact_email),
                user_id = COALESCE($10, user_id),
                tier = CASE WHEN $10::bigint IS NULL THEN tier ELSE {tier} END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}",
            tier = owner_tier_expr("$10"),
        );
        sqlx::query_as::<_, ServiceProvider>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.kind)
            .bind(&input.bio)
            .bind(&input.instruments)
            .bind(&input.city)
            .bind(input.hourly_rate_cents)
            .bind(&input.contact_email)
            .bind(input.user_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a provider. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE service_providers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
