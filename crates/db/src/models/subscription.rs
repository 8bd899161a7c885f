//! Subscription plan and subscription models.

use serde::{Deserialize, Serialize};
use soundstage_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// A row from the `subscription_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub duration_days: i32,
    pub trial_days: i32,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubscriptionPlan {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i32,
    #[validate(length(equal = 3, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 3660))]
    pub duration_days: i32,
    #[validate(range(min = 0, max = 365))]
    pub trial_days: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSubscriptionPlan {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i32>,
    #[validate(length(equal = 3, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 3660))]
    pub duration_days: Option<i32>,
    #[validate(range(min = 0, max = 365))]
    pub trial_days: Option<i32>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /subscription-plans`.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionPlanFilter {
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub plan_id: DbId,
    pub status: String,
    pub trial_ends_at: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub auto_renew: bool,
    pub cancelled_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /subscriptions`.
///
/// `user_id` is only honoured for editors and admins; everyone else
/// subscribes themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscription {
    pub user_id: Option<DbId>,
    pub plan_id: DbId,
    #[serde(default)]
    pub start_trial: bool,
    pub auto_renew: Option<bool>,
}

/// Body of `PUT /subscriptions/{id}`. Status moves go through the action
/// endpoints instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscription {
    pub auto_renew: Option<bool>,
}

/// Body of `POST /subscriptions/{id}/upgrade`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeSubscription {
    pub plan_id: DbId,
}

/// Query parameters for `GET /subscriptions`.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionFilter {
    pub user_id: Option<DbId>,
    pub plan_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of the expiry sweep.
#[derive(Debug, Clone, Serialize)]
pub struct ExpirySweep {
    pub expired: u64,
    pub subscription_ids: Vec<DbId>,
}
