//! Repository for `subscriptions` and the profile tier cascade.
//!
//! Status writes and the tier update of the subscriber's artist and
//! service-provider profiles commit together.

use sqlx::{PgPool, Postgres, Transaction};
use soundstage_core::pagination::Page;
use soundstage_core::subscription::{
    Transition, CURRENT_STATUSES, EXPIRABLE_STATUSES, STATUS_ACTIVE, STATUS_EXPIRED, STATUS_TRIAL,
    TIER_FREE,
};
use soundstage_core::types::{DbId, Timestamp};

use crate::models::subscription::{
    ExpirySweep, Subscription, SubscriptionFilter, UpdateSubscription,
};
use crate::Paged;

const COLUMNS: &str = "id, user_id, plan_id, status, trial_ends_at, start_date, end_date, \
                        auto_renew, cancelled_at, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL \
    AND ($1::bigint IS NULL OR user_id = $1) \
    AND ($2::bigint IS NULL OR plan_id = $2) \
    AND ($3::text IS NULL OR status = $3)";

/// Provides lifecycle operations for subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Insert a subscription in its initial state and cascade the tier.
    ///
    /// A second current subscription for the same user trips
    /// `uq_subscriptions_current_user`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        plan_id: DbId,
        auto_renew: bool,
        initial: &Transition,
    ) -> Result<Subscription, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let trial_ends_at = (initial.status == STATUS_TRIAL)
            .then_some(initial.end_date)
            .flatten();
        let query = format!(
            "INSERT INTO subscriptions
                (user_id, plan_id, status, trial_ends_at, start_date, end_date, auto_renew)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(plan_id)
            .bind(initial.status)
            .bind(trial_ends_at)
            .bind(initial.start_date)
            .bind(initial.end_date)
            .bind(auto_renew)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(tier) = initial.tier {
            Self::cascade_tier_inner(&mut tx, &[user_id], tier).await?;
        }

        tx.commit().await?;
        Ok(subscription)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subscription>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The user's one current subscription, if any.
    pub async fn find_current_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions
             WHERE user_id = $1 AND status = ANY($2) AND deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(CURRENT_STATUSES)
            .fetch_optional(pool)
            .await
    }

    /// The user's most recent subscription of any status.
    pub async fn find_latest_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &SubscriptionFilter,
        page: Page,
    ) -> Result<Paged<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE {LIST_WHERE}
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Subscription>(&query)
            .bind(filter.user_id)
            .bind(filter.plan_id)
            .bind(&filter.status)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM subscriptions WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.user_id)
            .bind(filter.plan_id)
            .bind(&filter.status)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Update the non-lifecycle fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubscription,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET auto_renew = COALESCE($2, auto_renew)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .bind(input.auto_renew)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a subscription. A deleted subscription grants no tier.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<DbId> = sqlx::query_scalar(
            "UPDATE subscriptions SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING user_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };
        Self::cascade_tier_inner(&mut tx, &[user_id], TIER_FREE).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a lifecycle transition computed by the domain layer.
    ///
    /// The write only lands if the row is still in `expected_status`, so two
    /// racing actions cannot both succeed. `plan_id` switches plans (upgrade).
    /// Returns `None` when the row is gone or its status moved underneath us.
    pub async fn apply_transition(
        pool: &PgPool,
        id: DbId,
        expected_status: &str,
        plan_id: Option<DbId>,
        transition: &Transition,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE subscriptions SET
                status = $2,
                plan_id = COALESCE($3, plan_id),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                trial_ends_at = CASE WHEN $2 = 'trial' THEN $5 ELSE trial_ends_at END,
                auto_renew = CASE
                    WHEN $2 = 'cancelled' THEN false
                    WHEN $2 = 'active' AND status IN ('cancelled', 'expired') THEN true
                    ELSE auto_renew
                END,
                cancelled_at = CASE
                    WHEN $2 = 'cancelled' THEN NOW()
                    WHEN $2 = 'active' THEN NULL
                    ELSE cancelled_at
                END
             WHERE id = $1 AND status = $6 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .bind(transition.status)
            .bind(plan_id)
            .bind(transition.start_date)
            .bind(transition.end_date)
            .bind(expected_status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(subscription) = updated else {
            return Ok(None);
        };

        if let Some(tier) = transition.tier {
            Self::cascade_tier_inner(&mut tx, &[subscription.user_id], tier).await?;
        }

        tx.commit().await?;
        Ok(Some(subscription))
    }

    /// Flip every expirable subscription past its end date to `expired` and
    /// drop the owners' profiles back to the free tier.
    pub async fn expire_due(pool: &PgPool, now: Timestamp) -> Result<ExpirySweep, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let rows: Vec<(DbId, DbId)> = sqlx::query_as(
            "UPDATE subscriptions SET status = $1
             WHERE status = ANY($2) AND end_date < $3 AND deleted_at IS NULL
             RETURNING id, user_id",
        )
        .bind(STATUS_EXPIRED)
        .bind(EXPIRABLE_STATUSES)
        .bind(now)
        .fetch_all(&mut *tx)
        .await?;

        let mut user_ids: Vec<DbId> = rows.iter().map(|(_, user_id)| *user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        if !user_ids.is_empty() {
            Self::cascade_tier_inner(&mut tx, &user_ids, TIER_FREE).await?;
        }

        tx.commit().await?;
        Ok(ExpirySweep {
            expired: rows.len() as u64,
            subscription_ids: rows.into_iter().map(|(id, _)| id).collect(),
        })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Set the tier on every live artist and service-provider profile owned
    /// by `user_ids`.
    ///
    /// Downgrades skip users that still hold a trial or active subscription.
    async fn cascade_tier_inner(
        tx: &mut Transaction<'_, Postgres>,
        user_ids: &[DbId],
        tier: &str,
    ) -> Result<u64, sqlx::Error> {
        let mut touched = 0;
        for table in ["artists", "service_providers"] {
            let query = format!(
                "UPDATE {table} p SET tier = $2
                 WHERE p.user_id = ANY($1) AND p.deleted_at IS NULL AND p.tier <> $2
                   AND ($2 <> 'free' OR NOT EXISTS (
                        SELECT 1 FROM subscriptions s
                        WHERE s.user_id = p.user_id AND s.deleted_at IS NULL
                          AND s.status IN ('{STATUS_TRIAL}', '{STATUS_ACTIVE}')))"
            );
            touched += sqlx::query(&query)
                .bind(user_ids)
                .bind(tier)
                .execute(&mut **tx)
                .await?
                .rows_affected();
        }
        tracing::debug!(?user_ids, tier, touched, "Cascaded profile tier");
        Ok(touched)
    }
}
