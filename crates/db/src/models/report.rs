//! Moderation report model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub reporter_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub reason: String,
    pub details: Option<String>,
    pub status: String,
    pub resolution_note: Option<String>,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /reports`. The reporter is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReport {
    pub entity_type: String,
    pub entity_id: DbId,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub reason: String,
    #[validate(length(max = 5000))]
    pub details: Option<String>,
}

/// Body of `PUT /reports/{id}/status`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReportStatus {
    pub status: String,
    #[validate(length(max = 5000))]
    pub resolution_note: Option<String>,
    /// Soft-delete the reported content when resolving.
    #[serde(default)]
    pub hide_content: bool,
}

/// Query parameters for `GET /reports`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub status: Option<String>,
    pub entity_type: Option<String>,
    pub reporter_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
