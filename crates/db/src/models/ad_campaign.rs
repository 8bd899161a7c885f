//! Ad campaign model and DTOs.

use serde::{Deserialize, Serialize};
use soundstage_core::ad_slots::{Booking, DateRange};
use soundstage_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `ad_campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdCampaign {
    pub id: DbId,
    pub client_id: DbId,
    pub spot_id: DbId,
    pub title: String,
    pub image_url: Option<String>,
    pub target_url: Option<String>,
    pub priority: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub view_count: i64,
    pub click_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdCampaign {
    /// The allocator's view of this campaign.
    pub fn booking(&self) -> Booking {
        Booking {
            campaign_id: self.id,
            priority: self.priority,
            range: DateRange {
                start: self.start_date,
                end: self.end_date,
            },
            status: self.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdCampaign {
    pub client_id: DbId,
    pub spot_id: DbId,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    pub image_url: Option<String>,
    #[validate(url)]
    pub target_url: Option<String>,
    pub priority: i32,
    pub start_date: Date,
    pub end_date: Date,
    /// Defaults to `draft`.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAdCampaign {
    pub client_id: Option<DbId>,
    pub spot_id: Option<DbId>,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: Option<String>,
    pub image_url: Option<String>,
    #[validate(url)]
    pub target_url: Option<String>,
    pub priority: Option<i32>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<String>,
}

/// The fully-resolved slot a campaign write will occupy.
///
/// Built by merging an update DTO over the stored row so the allocator
/// always checks the post-write state.
#[derive(Debug, Clone)]
pub struct CampaignPlacement {
    pub client_id: DbId,
    pub spot_id: DbId,
    pub title: String,
    pub image_url: Option<String>,
    pub target_url: Option<String>,
    pub priority: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
}

impl CampaignPlacement {
    pub fn from_create(input: &CreateAdCampaign, default_status: &str) -> Self {
        Self {
            client_id: input.client_id,
            spot_id: input.spot_id,
            title: input.title.clone(),
            image_url: input.image_url.clone(),
            target_url: input.target_url.clone(),
            priority: input.priority,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input
                .status
                .clone()
                .unwrap_or_else(|| default_status.to_string()),
        }
    }

    pub fn merged(current: &AdCampaign, patch: &UpdateAdCampaign) -> Self {
        Self {
            client_id: patch.client_id.unwrap_or(current.client_id),
            spot_id: patch.spot_id.unwrap_or(current.spot_id),
            title: patch.title.clone().unwrap_or_else(|| current.title.clone()),
            image_url: patch.image_url.clone().or_else(|| current.image_url.clone()),
            target_url: patch
                .target_url
                .clone()
                .or_else(|| current.target_url.clone()),
            priority: patch.priority.unwrap_or(current.priority),
            start_date: patch.start_date.unwrap_or(current.start_date),
            end_date: patch.end_date.unwrap_or(current.end_date),
            status: patch.status.clone().unwrap_or_else(|| current.status.clone()),
        }
    }
}

/// Query parameters for `GET /ad-campaigns`.
#[derive(Debug, Default, Deserialize)]
pub struct AdCampaignFilter {
    pub spot_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub status: Option<String>,
    /// Only campaigns whose flight includes this date.
    pub active_on: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /ad-spots/{id}/availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Date,
    pub end_date: Date,
}
