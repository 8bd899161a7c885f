//! Ad spot (page placement) model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `ad_spots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdSpot {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub page: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdSpot {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub page: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAdSpot {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub page: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /ad-spots`.
#[derive(Debug, Default, Deserialize)]
pub struct AdSpotFilter {
    pub q: Option<String>,
    pub page: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
