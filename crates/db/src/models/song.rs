//! Song model and DTOs.
//!
//! Songs link to one or more artists through `song_artists`; the API
//! response embeds the linked artist ids in credit order.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `songs` table plus its aggregated artist ids.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Song {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub genre: Option<String>,
    pub duration_secs: Option<i32>,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<Date>,
    pub lyrics: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub artist_ids: Vec<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a song together with its artist credits.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSong {
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(max = 80))]
    pub genre: Option<String>,
    #[validate(range(min = 1, max = 86400))]
    pub duration_secs: Option<i32>,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<Date>,
    pub lyrics: Option<String>,
    #[validate(length(min = 1, message = "must credit at least one artist"))]
    pub artist_ids: Vec<DbId>,
}

/// DTO for partially updating a song.
///
/// When `artist_ids` is present the credits are replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSong {
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    #[validate(length(max = 80))]
    pub genre: Option<String>,
    #[validate(range(min = 1, max = 86400))]
    pub duration_secs: Option<i32>,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<Date>,
    pub lyrics: Option<String>,
    #[validate(length(min = 1, message = "must credit at least one artist"))]
    pub artist_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /songs`.
#[derive(Debug, Default, Deserialize)]
pub struct SongFilter {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub artist_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of a like/unlike toggle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}
