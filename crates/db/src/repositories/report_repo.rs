//! Repository for moderation `reports`.

use sqlx::PgPool;
use soundstage_core::moderation::{self, STATUS_RESOLVED};
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::report::{CreateReport, Report, ReportFilter, UpdateReportStatus};
use crate::Paged;

const COLUMNS: &str = "id, reporter_id, entity_type, entity_id, reason, details, status, \
                        resolution_note, resolved_by, resolved_at, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::text IS NULL OR status = $1) \
    AND ($2::text IS NULL OR entity_type = $2) \
    AND ($3::bigint IS NULL OR reporter_id = $3)";

/// Provides CRUD and moderation operations for reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Whether the reported content exists and is not soft-deleted.
    ///
    /// `table` must come from [`moderation::target_table`].
    pub async fn target_exists(
        pool: &PgPool,
        table: &'static str,
        entity_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query =
            format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND deleted_at IS NULL)");
        sqlx::query_scalar(&query)
            .bind(entity_id)
            .fetch_one(pool)
            .await
    }

    /// File a report. A second open report by the same reporter on the same
    /// target trips `uq_reports_open_per_reporter`.
    pub async fn create(
        pool: &PgPool,
        reporter_id: DbId,
        input: &CreateReport,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (reporter_id, entity_type, entity_id, reason, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(reporter_id)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.reason)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List reports, oldest open work first.
    pub async fn list(
        pool: &PgPool,
        filter: &ReportFilter,
        page: Page,
    ) -> Result<Paged<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE {LIST_WHERE}
             ORDER BY created_at ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Report>(&query)
            .bind(&filter.status)
            .bind(&filter.entity_type)
            .bind(filter.reporter_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM reports WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.status)
            .bind(&filter.entity_type)
            .bind(filter.reporter_id)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Move a report to a new status.
    ///
    /// Closing stamps `resolved_by`/`resolved_at`; re-opening clears them.
    /// With `hide_content` on a resolve, the reported row is soft-deleted in
    /// the same transaction. Returns `None` when the report is gone or no
    /// longer in `expected_status`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected_status: &str,
        input: &UpdateReportStatus,
        moderator_id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let closing = moderation::is_closing(&input.status);
        let query = format!(
            "UPDATE reports SET
                status = $2,
                resolution_note = COALESCE($3, resolution_note),
                resolved_by = CASE WHEN $4::bool THEN $5 ELSE NULL END,
                resolved_at = CASE WHEN $4 THEN NOW() ELSE NULL END
             WHERE id = $1 AND status = $6 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.resolution_note)
            .bind(closing)
            .bind(moderator_id)
            .bind(expected_status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(report) = updated else {
            return Ok(None);
        };

        if input.hide_content && report.status == STATUS_RESOLVED {
            // The CHECK on entity_type keeps this in the reportable set.
            if let Ok(table) = moderation::target_table(&report.entity_type) {
                let hide = format!(
                    "UPDATE {table} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL"
                );
                let hidden = sqlx::query(&hide)
                    .bind(report.entity_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                tracing::info!(
                    report_id = report.id,
                    entity_type = %report.entity_type,
                    entity_id = report.entity_id,
                    hidden,
                    "Reported content hidden",
                );
            }
        }

        tx.commit().await?;
        Ok(Some(report))
    }

    /// Soft-delete a report. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE reports SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
