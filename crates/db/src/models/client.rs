//! Advertiser client model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Query parameters for `GET /clients`.
#[derive(Debug, Default, Deserialize)]
pub struct ClientFilter {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
