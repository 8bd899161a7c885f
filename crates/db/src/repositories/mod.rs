//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement writes open
//! their own transaction.

pub mod ad_campaign_repo;
pub mod ad_spot_repo;
pub mod article_repo;
pub mod artist_repo;
pub mod client_repo;
pub mod engagement_repo;
pub mod event_repo;
pub mod playlist_repo;
pub mod report_repo;
pub mod role_repo;
pub mod service_provider_repo;
pub mod session_repo;
pub mod song_repo;
pub mod subscription_plan_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use ad_campaign_repo::{AdCampaignRepo, PlacementError};
pub use ad_spot_repo::AdSpotRepo;
pub use article_repo::ArticleRepo;
pub use artist_repo::ArtistRepo;
pub use client_repo::ClientRepo;
pub use engagement_repo::EngagementRepo;
pub use event_repo::EventRepo;
pub use playlist_repo::PlaylistRepo;
pub use report_repo::ReportRepo;
pub use role_repo::RoleRepo;
pub use service_provider_repo::ServiceProviderRepo;
pub use session_repo::SessionRepo;
pub use song_repo::SongRepo;
pub use subscription_plan_repo::SubscriptionPlanRepo;
pub use subscription_repo::SubscriptionRepo;
pub use user_repo::UserRepo;

use soundstage_core::subscription::{STATUS_ACTIVE, STATUS_TRIAL, TIER_FREE, TIER_SUBSCRIBED};

/// SQL expression for the profile tier implied by the subscriptions of the
/// user bound at `param` (e.g. `"$6"`).
pub(crate) fn owner_tier_expr(param: &str) -> String {
    format!(
        "CASE WHEN EXISTS (
            SELECT 1 FROM subscriptions s
            WHERE s.user_id = {param}::bigint AND s.deleted_at IS NULL
              AND s.status IN ('{STATUS_TRIAL}', '{STATUS_ACTIVE}'))
         THEN '{TIER_SUBSCRIBED}' ELSE '{TIER_FREE}' END"
    )
}
