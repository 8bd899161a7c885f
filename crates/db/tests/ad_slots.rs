//! Integration tests for the ad-campaign slot allocator.
//!
//! Verifies against a real database that:
//! - A sixth overlapping active campaign on a spot is rejected
//! - An occupied priority in an overlapping window is rejected
//! - Non-overlapping and non-active campaigns never block
//! - Activating a draft runs the check, and an edit never conflicts with itself
//! - Inactive spots refuse bookings but still allow pausing and edits

use assert_matches::assert_matches;
use chrono::NaiveDate;
use soundstage_core::ad_slots::SlotConflict;
use soundstage_core::error::CoreError;
use soundstage_db::models::ad_campaign::{CreateAdCampaign, UpdateAdCampaign};
use soundstage_db::models::ad_spot::CreateAdSpot;
use soundstage_db::models::client::CreateClient;
use soundstage_db::repositories::{AdCampaignRepo, AdSpotRepo, ClientRepo, PlacementError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
}

async fn seed_spot(pool: &PgPool, code: &str, is_active: bool) -> (i64, i64) {
    let client = ClientRepo::create(
        pool,
        &CreateClient {
            name: format!("Client {code}"),
            contact_email: None,
            phone: None,
            company: None,
        },
    )
    .await
    .unwrap();
    let spot = AdSpotRepo::create(
        pool,
        &CreateAdSpot {
            code: code.to_string(),
            name: format!("Spot {code}"),
            page: Some("home".to_string()),
            description: None,
            is_active: Some(is_active),
        },
    )
    .await
    .unwrap();
    (client.id, spot.id)
}

fn campaign(
    client_id: i64,
    spot_id: i64,
    priority: i32,
    start: u32,
    end: u32,
    status: &str,
) -> CreateAdCampaign {
    CreateAdCampaign {
        client_id,
        spot_id,
        title: format!("P{priority} {start}-{end}"),
        image_url: None,
        target_url: None,
        priority,
        start_date: day(start),
        end_date: day(end),
        status: Some(status.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn occupied_priority_in_overlapping_window_is_rejected(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "home-top", true).await;

    let first = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 1, 10, "active"))
        .await
        .unwrap();

    let err = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 10, 20, "active"))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        PlacementError::Slot(SlotConflict::PriorityTaken { priority: 1, held_by }) if held_by == first.id
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sixth_overlapping_campaign_is_rejected(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "home-side", true).await;

    for priority in 1..=5 {
        AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, priority, 1, 31, "active"))
            .await
            .unwrap();
    }

    // Every priority is taken, so the sixth booking fails on the first check.
    let err = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 3, 15, 16, "active"))
        .await
        .unwrap_err();
    assert_matches!(err, PlacementError::Slot(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_overlapping_and_draft_campaigns_do_not_block(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "news-banner", true).await;

    AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 2, 1, 10, "active"))
        .await
        .unwrap();

    // Adjacent window, same priority.
    AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 2, 11, 20, "active"))
        .await
        .unwrap();

    // Overlapping window but not active.
    let draft = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 2, 5, 15, "draft"))
        .await
        .unwrap();
    assert_eq!(draft.status, "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activating_a_draft_runs_the_check(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "events-top", true).await;

    AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 4, 1, 10, "active"))
        .await
        .unwrap();
    let draft = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 4, 3, 8, "draft"))
        .await
        .unwrap();

    let activate = UpdateAdCampaign {
        status: Some("active".to_string()),
        ..Default::default()
    };
    let err = AdCampaignRepo::update(&pool, draft.id, &activate)
        .await
        .unwrap_err();
    assert_matches!(err, PlacementError::Slot(SlotConflict::PriorityTaken { .. }));

    let activate_elsewhere = UpdateAdCampaign {
        status: Some("active".to_string()),
        priority: Some(5),
        ..Default::default()
    };
    let updated = AdCampaignRepo::update(&pool, draft.id, &activate_elsewhere)
        .await
        .unwrap();
    assert_eq!(updated.status, "active");
    assert_eq!(updated.priority, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn editing_an_active_campaign_does_not_conflict_with_itself(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "artist-page", true).await;

    let live = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 1, 10, "active"))
        .await
        .unwrap();

    let extend = UpdateAdCampaign {
        end_date: Some(day(20)),
        ..Default::default()
    };
    let updated = AdCampaignRepo::update(&pool, live.id, &extend).await.unwrap();
    assert_eq!(updated.end_date, day(20));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_spot_refuses_bookings(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "retired", false).await;

    let err = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 1, 10, "draft"))
        .await
        .unwrap_err();
    assert_matches!(err, PlacementError::Rejected(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pausing_on_deactivated_spot_is_allowed(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "sidebar", true).await;
    let running = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 1, 10, "active"))
        .await
        .unwrap();
    sqlx::query("UPDATE ad_spots SET is_active = false WHERE id = $1")
        .bind(spot_id)
        .execute(&pool)
        .await
        .unwrap();

    let pause = UpdateAdCampaign {
        status: Some("paused".to_string()),
        title: Some("Paused run".to_string()),
        ..Default::default()
    };
    let paused = AdCampaignRepo::update(&pool, running.id, &pause).await.unwrap();
    assert_eq!(paused.status, "paused");
    assert_eq!(paused.title, "Paused run");

    // Putting it back on air still needs an active spot.
    let resume = UpdateAdCampaign {
        status: Some("active".to_string()),
        ..Default::default()
    };
    let err = AdCampaignRepo::update(&pool, running.id, &resume)
        .await
        .unwrap_err();
    assert_matches!(err, PlacementError::Rejected(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reversed_dates_are_rejected_before_touching_the_spot(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "footer", true).await;

    let err = AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 10, 1, "active"))
        .await
        .unwrap_err();
    assert_matches!(err, PlacementError::Rejected(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn live_listing_orders_by_priority(pool: PgPool) {
    let (client_id, spot_id) = seed_spot(&pool, "home-hero", true).await;

    AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 3, 1, 10, "active"))
        .await
        .unwrap();
    AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 1, 1, 10, "active"))
        .await
        .unwrap();
    AdCampaignRepo::create(&pool, &campaign(client_id, spot_id, 2, 11, 20, "active"))
        .await
        .unwrap();

    let live = AdCampaignRepo::list_live(&pool, spot_id, day(5)).await.unwrap();
    let priorities: Vec<i32> = live.iter().map(|c| c.priority).collect();
    assert_eq!(priorities, vec![1, 3]);
}
