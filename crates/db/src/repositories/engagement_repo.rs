//! Repository for `engagement_events` and the denormalised view/click counters.

use sqlx::PgPool;
use soundstage_core::engagement::{self, EventKind, RecordOutcome, TargetKind, ViewerKey};
use soundstage_core::types::{DbId, Timestamp};

use crate::models::engagement::{EngagementTotal, TopTarget};

/// Records engagement events with a per-viewer dedup window.
pub struct EngagementRepo;

impl EngagementRepo {
    /// Record a view or click and bump the target's counter unless the same
    /// viewer already counted inside the dedup window.
    ///
    /// The target row is locked for the duration, so concurrent requests from
    /// one viewer count at most once. Returns `None` when the target does not
    /// exist.
    pub async fn record(
        pool: &PgPool,
        target: TargetKind,
        target_id: DbId,
        kind: EventKind,
        viewer: &ViewerKey,
        now: Timestamp,
    ) -> Result<Option<RecordOutcome>, sqlx::Error> {
        let Ok(column) = target.counter_column(kind) else {
            return Ok(None);
        };
        let table = target.table();

        let mut tx = pool.begin().await?;

        let lock = format!("SELECT {column} FROM {table} WHERE id = $1 AND deleted_at IS NULL FOR UPDATE");
        let current: Option<i64> = sqlx::query_scalar(&lock)
            .bind(target_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let last_seen: Option<Timestamp> = match viewer {
            ViewerKey::User(user_id) => {
                sqlx::query_scalar(
                    "SELECT MAX(created_at) FROM engagement_events
                     WHERE target_type = $1 AND target_id = $2 AND kind = $3 AND user_id = $4",
                )
                .bind(target.as_str())
                .bind(target_id)
                .bind(kind.as_str())
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?
            }
            ViewerKey::Anonymous { ip, user_agent } => {
                sqlx::query_scalar(
                    "SELECT MAX(created_at) FROM engagement_events
                     WHERE target_type = $1 AND target_id = $2 AND kind = $3
                       AND user_id IS NULL AND ip_address = $4 AND user_agent = $5",
                )
                .bind(target.as_str())
                .bind(target_id)
                .bind(kind.as_str())
                .bind(ip)
                .bind(user_agent)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        if engagement::is_duplicate(last_seen, now) {
            return Ok(Some(RecordOutcome {
                counted: false,
                count: current,
            }));
        }

        let (user_id, ip, user_agent) = match viewer {
            ViewerKey::User(id) => (Some(*id), None, None),
            ViewerKey::Anonymous { ip, user_agent } => {
                (None, Some(ip.as_str()), Some(user_agent.as_str()))
            }
        };
        sqlx::query(
            "INSERT INTO engagement_events
                (target_type, target_id, kind, user_id, ip_address, user_agent, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(target.as_str())
        .bind(target_id)
        .bind(kind.as_str())
        .bind(user_id)
        .bind(ip)
        .bind(user_agent)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let bump = format!("UPDATE {table} SET {column} = {column} + 1 WHERE id = $1 RETURNING {column}");
        let count: i64 = sqlx::query_scalar(&bump)
            .bind(target_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(RecordOutcome {
            counted: true,
            count,
        }))
    }

    /// Delete raw events older than `cutoff`. Counters are left untouched.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM engagement_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Event totals per target type and kind since `since`.
    pub async fn totals_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<EngagementTotal>, sqlx::Error> {
        sqlx::query_as::<_, EngagementTotal>(
            "SELECT target_type, kind, COUNT(*) AS events,
                    COUNT(DISTINCT target_id) AS unique_targets
             FROM engagement_events
             WHERE created_at >= $1
             GROUP BY target_type, kind
             ORDER BY target_type, kind",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// The `limit` most-engaged targets since `since`.
    pub async fn top_targets_since(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<TopTarget>, sqlx::Error> {
        sqlx::query_as::<_, TopTarget>(
            "SELECT target_type, target_id, kind, COUNT(*) AS events
             FROM engagement_events
             WHERE created_at >= $1
             GROUP BY target_type, target_id, kind
             ORDER BY events DESC, target_type, target_id
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
