//! Artist profile model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artist {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub user_id: Option<DbId>,
    /// Subscription-derived tier, `free` or `subscribed`. Never client-written.
    pub tier: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an artist. `slug` is derived from `name` when absent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArtist {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub slug: Option<String>,
    #[validate(length(max = 10000))]
    pub bio: Option<String>,
    #[validate(length(max = 80))]
    pub country: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub user_id: Option<DbId>,
}

/// DTO for partially updating an artist.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateArtist {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[validate(length(max = 10000))]
    pub bio: Option<String>,
    #[validate(length(max = 80))]
    pub country: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub user_id: Option<DbId>,
}

/// Query parameters for `GET /artists`.
#[derive(Debug, Default, Deserialize)]
pub struct ArtistFilter {
    pub q: Option<String>,
    pub tier: Option<String>,
    pub country: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
