//! Service provider (teacher / studio / producer) directory model.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// All valid provider kinds.
pub const PROVIDER_KINDS: &[&str] = &["teacher", "studio", "producer", "other"];

/// A row from the `service_providers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceProvider {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub kind: String,
    pub bio: Option<String>,
    pub instruments: Vec<String>,
    pub city: Option<String>,
    pub hourly_rate_cents: Option<i32>,
    pub contact_email: Option<String>,
    pub user_id: Option<DbId>,
    pub tier: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceProvider {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub slug: Option<String>,
    pub kind: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    pub city: Option<String>,
    #[validate(range(min = 0))]
    pub hourly_rate_cents: Option<i32>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceProvider {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub kind: Option<String>,
    pub bio: Option<String>,
    pub instruments: Option<Vec<String>>,
    pub city: Option<String>,
    #[validate(range(min = 0))]
    pub hourly_rate_cents: Option<i32>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub user_id: Option<DbId>,
}

/// Query parameters for `GET /service-providers`.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceProviderFilter {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub city: Option<String>,
    /// Matches providers whose `instruments` array contains this value.
    pub instrument: Option<String>,
    pub tier: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
