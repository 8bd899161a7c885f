//! Playlist model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `playlists` table with its song count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub is_public: bool,
    pub song_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One entry of a playlist, in play order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistEntry {
    pub song_id: DbId,
    pub title: String,
    pub slug: String,
    pub position: i32,
    pub added_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaylist {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlaylist {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Body of `POST /playlists/{id}/songs`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddPlaylistSong {
    pub song_id: DbId,
    /// Insert position (0-based). Appends when absent.
    pub position: Option<i32>,
}

/// Query parameters for `GET /playlists`.
#[derive(Debug, Default, Deserialize)]
pub struct PlaylistFilter {
    pub q: Option<String>,
    pub owner_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
