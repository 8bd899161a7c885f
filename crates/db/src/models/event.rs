//! Live event model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub ticket_url: Option<String>,
    pub artist_id: Option<DbId>,
    pub view_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    #[validate(url)]
    pub ticket_url: Option<String>,
    pub artist_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    #[validate(url)]
    pub ticket_url: Option<String>,
    pub artist_id: Option<DbId>,
}

/// Query parameters for `GET /events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub q: Option<String>,
    pub city: Option<String>,
    pub artist_id: Option<DbId>,
    /// Only events that have not started yet.
    #[serde(default)]
    pub upcoming: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
