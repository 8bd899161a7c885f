//! Repository for the `subscription_plans` table.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::subscription::{
    CreateSubscriptionPlan, SubscriptionPlan, SubscriptionPlanFilter, UpdateSubscriptionPlan,
};
use crate::Paged;

const COLUMNS: &str = "id, code, name, description, price_cents, currency, duration_days, \
                        trial_days, is_active, deleted_at, created_at, updated_at";

const LIST_WHERE: &str = "deleted_at IS NULL AND ($1::bool IS NULL OR is_active = $1)";

/// Provides CRUD operations for subscription plans.
pub struct SubscriptionPlanRepo;

impl SubscriptionPlanRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubscriptionPlan,
    ) -> Result<SubscriptionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscription_plans
                (code, name, description, price_cents, currency, duration_days, trial_days, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'USD'), $6, COALESCE($7, 0), COALESCE($8, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(input.duration_days)
            .bind(input.trial_days)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM subscription_plans WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List plans, cheapest first.
    pub async fn list(
        pool: &PgPool,
        filter: &SubscriptionPlanFilter,
        page: Page,
    ) -> Result<Paged<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscription_plans WHERE {LIST_WHERE}
             ORDER BY price_cents ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(filter.is_active)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM subscription_plans WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.is_active)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubscriptionPlan,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE subscription_plans SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price_cents = COALESCE($5, price_cents),
                currency = COALESCE($6, currency),
                duration_days = COALESCE($7, duration_days),
                trial_days = COALESCE($8, trial_days),
                is_active = COALESCE($9, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(input.duration_days)
            .bind(input.trial_days)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a plan. Existing subscriptions keep referencing it.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subscription_plans SET deleted_at = NOW(), is_active = false
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
