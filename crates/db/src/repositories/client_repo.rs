//! Repository for the `clients` (advertisers) table.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::client::{Client, ClientFilter, CreateClient, UpdateClient};
use crate::Paged;

const COLUMNS: &str =
    "id, name, contact_email, phone, company, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR company ILIKE '%' || $1 || '%')";

/// Provides CRUD operations for advertiser clients.
pub struct ClientRepo;

impl ClientRepo {
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, contact_email, phone, company)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.phone)
            .bind(&input.company)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &ClientFilter,
        page: Page,
    ) -> Result<Paged<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients WHERE {LIST_WHERE}
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Client>(&query)
            .bind(&filter.q)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM clients WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                contact_email = COALESCE($3, contact_email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.phone)
            .bind(&input.company)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a client. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE clients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
