//! Repository for the `events` table.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use crate::Paged;

const COLUMNS: &str = "id, title, description, venue, city, starts_at, ends_at, ticket_url, \
                        artist_id, view_count, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%' OR venue ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR city ILIKE $2) \
    AND ($3::bigint IS NULL OR artist_id = $3) \
    AND (NOT $4 OR starts_at >= NOW())";

/// Provides CRUD operations for live events.
pub struct EventRepo;

impl EventRepo {
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (title, description, venue, city, starts_at, ends_at, ticket_url, artist_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.venue)
            .bind(&input.city)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.ticket_url)
            .bind(input.artist_id)
            .fetch_one(pool)
            .await
    }

    /// Find an event by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events in chronological order.
    pub async fn list(
        pool: &PgPool,
        filter: &EventFilter,
        page: Page,
    ) -> Result<Paged<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE {LIST_WHERE}
             ORDER BY starts_at ASC, id ASC
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Event>(&query)
            .bind(&filter.q)
            .bind(&filter.city)
            .bind(filter.artist_id)
            .bind(filter.upcoming)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM events WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(&filter.city)
            .bind(filter.artist_id)
            .bind(filter.upcoming)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Update an event. The `ck_events_time_range` check guards the merged
    /// start/end pair.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                venue = COALESCE($4, venue),
                city = COALESCE($5, city),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                ticket_url = COALESCE($8, ticket_url),
                artist_id = COALESCE($9, artist_id)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.venue)
            .bind(&input.city)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.ticket_url)
            .bind(input.artist_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an event. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE events SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
