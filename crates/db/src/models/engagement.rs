//! Engagement event log and analytics rows.

use serde::{Deserialize, Serialize};
use soundstage_core::types::DbId;
use sqlx::FromRow;

/// Per-target, per-kind event totals for the analytics summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EngagementTotal {
    pub target_type: String,
    pub kind: String,
    pub events: i64,
    pub unique_targets: i64,
}

/// Most-engaged targets inside the summary window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopTarget {
    pub target_type: String,
    pub target_id: DbId,
    pub kind: String,
    pub events: i64,
}

/// Query parameters for `GET /admin/analytics/summary`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsSummaryQuery {
    pub days: Option<i64>,
}
