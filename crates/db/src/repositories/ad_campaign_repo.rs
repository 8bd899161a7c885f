//! Repository for the `ad_campaigns` table and the slot allocator's writes.
//!
//! Every write that could occupy a slot runs in one transaction that first
//! locks the target `ad_spots` row, so two bookings on the same spot are
//! checked one after the other against committed state.

use sqlx::{PgPool, Postgres, Transaction};
use soundstage_core::ad_slots::{self, Booking, DateRange, SlotConflict, SlotRequest};
use soundstage_core::error::CoreError;
use soundstage_core::pagination::Page;
use soundstage_core::types::{Date, DbId};

use crate::models::ad_campaign::{
    AdCampaign, AdCampaignFilter, CampaignPlacement, CreateAdCampaign, UpdateAdCampaign,
};
use crate::Paged;

const COLUMNS: &str = "id, client_id, spot_id, title, image_url, target_url, priority, \
                        start_date, end_date, status, view_count, click_count, \
                        deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::bigint IS NULL OR spot_id = $1) \
    AND ($2::bigint IS NULL OR client_id = $2) \
    AND ($3::text IS NULL OR status = $3) \
    AND ($4::date IS NULL OR (start_date <= $4 AND end_date >= $4))";

/// Why a campaign write was refused.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    /// Invalid input, a missing spot/campaign, or an inactive spot.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The allocator found no room for the requested slot.
    #[error("{0}")]
    Slot(#[from] SlotConflict),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD operations for ad campaigns.
pub struct AdCampaignRepo;

impl AdCampaignRepo {
    /// Create a campaign after checking its slot. Status defaults to `draft`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAdCampaign,
    ) -> Result<AdCampaign, PlacementError> {
        let placement = CampaignPlacement::from_create(input, ad_slots::CAMPAIGN_DRAFT);
        validate_placement(&placement)?;

        let mut tx = pool.begin().await?;
        Self::lock_spot(&mut tx, placement.spot_id, true).await?;
        Self::check_slot_inner(&mut tx, &placement, None).await?;

        let query = format!(
            "INSERT INTO ad_campaigns
                (client_id, spot_id, title, image_url, target_url, priority,
                 start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, AdCampaign>(&query)
            .bind(placement.client_id)
            .bind(placement.spot_id)
            .bind(&placement.title)
            .bind(&placement.image_url)
            .bind(&placement.target_url)
            .bind(placement.priority)
            .bind(placement.start_date)
            .bind(placement.end_date)
            .bind(&placement.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(campaign)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdCampaign>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM ad_campaigns WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, AdCampaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &AdCampaignFilter,
        page: Page,
    ) -> Result<Paged<AdCampaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_campaigns WHERE {LIST_WHERE}
             ORDER BY start_date DESC, priority ASC, id ASC
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, AdCampaign>(&query)
            .bind(filter.spot_id)
            .bind(filter.client_id)
            .bind(&filter.status)
            .bind(filter.active_on)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM ad_campaigns WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.spot_id)
            .bind(filter.client_id)
            .bind(&filter.status)
            .bind(filter.active_on)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Apply a partial update, re-running the slot check against the merged
    /// campaign (excluding itself).
    ///
    /// An inactive spot only refuses updates that leave the campaign active
    /// or move it onto that spot.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAdCampaign,
    ) -> Result<AdCampaign, PlacementError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM ad_campaigns WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        let current = sqlx::query_as::<_, AdCampaign>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "AdCampaign",
                id,
            })?;

        let placement = CampaignPlacement::merged(&current, input);
        validate_placement(&placement)?;

        let books_slot = placement.status == ad_slots::CAMPAIGN_ACTIVE
            || placement.spot_id != current.spot_id;
        Self::lock_spot(&mut tx, placement.spot_id, books_slot).await?;
        Self::check_slot_inner(&mut tx, &placement, Some(id)).await?;

        let query = format!(
            "UPDATE ad_campaigns SET
                client_id = $2, spot_id = $3, title = $4, image_url = $5, target_url = $6,
                priority = $7, start_date = $8, end_date = $9, status = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, AdCampaign>(&query)
            .bind(id)
            .bind(placement.client_id)
            .bind(placement.spot_id)
            .bind(&placement.title)
            .bind(&placement.image_url)
            .bind(&placement.target_url)
            .bind(placement.priority)
            .bind(placement.start_date)
            .bind(placement.end_date)
            .bind(&placement.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(campaign)
    }

    /// Soft-delete a campaign, freeing its slot. Returns `true` if a row was
    /// marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ad_campaigns SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active campaigns on `spot_id` whose flight includes `day`, best
    /// priority first.
    pub async fn list_live(
        pool: &PgPool,
        spot_id: DbId,
        day: Date,
    ) -> Result<Vec<AdCampaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_campaigns
             WHERE spot_id = $1 AND status = $2 AND deleted_at IS NULL
               AND start_date <= $3 AND end_date >= $3
             ORDER BY priority ASC, id ASC"
        );
        sqlx::query_as::<_, AdCampaign>(&query)
            .bind(spot_id)
            .bind(ad_slots::CAMPAIGN_ACTIVE)
            .bind(day)
            .fetch_all(pool)
            .await
    }

    /// Active bookings on `spot_id` overlapping `range`.
    pub async fn bookings(
        pool: &PgPool,
        spot_id: DbId,
        range: &DateRange,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let rows = Self::overlapping_inner(&mut *conn, spot_id, range).await?;
        Ok(rows.iter().map(AdCampaign::booking).collect())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Lock the spot row and require it to exist, and to be active when
    /// `require_active` is set.
    async fn lock_spot(
        tx: &mut Transaction<'_, Postgres>,
        spot_id: DbId,
        require_active: bool,
    ) -> Result<(), PlacementError> {
        let is_active: Option<bool> = sqlx::query_scalar(
            "SELECT is_active FROM ad_spots WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(spot_id)
        .fetch_optional(&mut **tx)
        .await?;

        match is_active {
            Some(true) => Ok(()),
            Some(false) if !require_active => Ok(()),
            Some(false) => {
                Err(CoreError::Validation(format!("Ad spot {spot_id} is not active")).into())
            }
            None => {
                Err(CoreError::Validation(format!("Ad spot {spot_id} does not exist")).into())
            }
        }
    }

    /// Run the allocator for placements that will be active after the write.
    async fn check_slot_inner(
        tx: &mut Transaction<'_, Postgres>,
        placement: &CampaignPlacement,
        exclude: Option<DbId>,
    ) -> Result<(), PlacementError> {
        if placement.status != ad_slots::CAMPAIGN_ACTIVE {
            return Ok(());
        }

        let range = DateRange {
            start: placement.start_date,
            end: placement.end_date,
        };
        let rows = Self::overlapping_inner(&mut **tx, placement.spot_id, &range).await?;
        let bookings: Vec<Booking> = rows.iter().map(AdCampaign::booking).collect();

        let request = SlotRequest {
            campaign_id: exclude,
            priority: placement.priority,
            range,
        };
        ad_slots::check_slot(&request, &bookings)?;
        Ok(())
    }

    async fn overlapping_inner(
        conn: &mut sqlx::PgConnection,
        spot_id: DbId,
        range: &DateRange,
    ) -> Result<Vec<AdCampaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_campaigns
             WHERE spot_id = $1 AND status = $2 AND deleted_at IS NULL
               AND start_date <= $4 AND end_date >= $3
             ORDER BY priority ASC, id ASC"
        );
        sqlx::query_as::<_, AdCampaign>(&query)
            .bind(spot_id)
            .bind(ad_slots::CAMPAIGN_ACTIVE)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(conn)
            .await
    }
}

/// Shape checks that do not need the database.
fn validate_placement(placement: &CampaignPlacement) -> Result<(), CoreError> {
    DateRange::new(placement.start_date, placement.end_date)?;
    ad_slots::validate_priority(placement.priority)?;
    ad_slots::validate_status(&placement.status)
}
