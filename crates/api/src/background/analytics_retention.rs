//! Daily purge of raw engagement events.
//!
//! Only `engagement_events` rows are removed. The denormalised view and
//! click counters on the target rows are never touched.

use std::time::Duration;

use chrono::Utc;
use soundstage_core::types::Timestamp;
use soundstage_db::repositories::EngagementRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest retention honoured; larger settings keep a century of events.
const MAX_RETENTION_DAYS: i64 = 36_500;

/// Run the retention loop until `cancel` fires.
///
/// The first purge happens immediately on start.
pub async fn run(pool: PgPool, retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Analytics retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Analytics retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_once(&pool, retention_days, Utc::now()).await {
                    Ok(0) => tracing::debug!("Analytics retention: no rows to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Analytics retention: purged old events"),
                    Err(e) => tracing::error!(error = %e, "Analytics retention: cleanup failed"),
                }
            }
        }
    }
}

/// Delete events older than `retention_days` before `now`.
pub async fn purge_once(
    pool: &PgPool,
    retention_days: i64,
    now: Timestamp,
) -> Result<u64, sqlx::Error> {
    EngagementRepo::delete_older_than(pool, cutoff(retention_days, now)).await
}

/// Oldest timestamp that survives a purge. Retention is clamped to
/// 1..=[`MAX_RETENTION_DAYS`].
fn cutoff(retention_days: i64, now: Timestamp) -> Timestamp {
    now - chrono::Duration::days(retention_days.clamp(1, MAX_RETENTION_DAYS))
}
