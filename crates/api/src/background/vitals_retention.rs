//! Periodic purge of stored vital readings.
//!
//! Deletes rows from `vital_readings` recorded more than `retention_days`
//! ago. Runs on a fixed interval using `tokio::time::interval`; the first
//! pass happens immediately.

use std::time::Duration;

use chrono::Utc;
use guardian_db::repositories::VitalReadingRepo;
use guardian_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the purge runs.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the retention loop until `cancel` is triggered.
pub async fn run(pool: DbPool, retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = PURGE_INTERVAL.as_secs(),
        "Vital readings retention job started"
    );

    let mut interval = tokio::time::interval(PURGE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Vital readings retention job stopping");
                break;
            }
            _ = interval.tick() => {
                purge_once(&pool, retention_days).await;
            }
        }
    }
}

/// One purge pass. Failures are logged and retried on the next tick.
pub async fn purge_once(pool: &DbPool, retention_days: i64) -> u64 {
    let cutoff = Utc::now() - chrono::Duration::days(retention_days);
    match VitalReadingRepo::delete_older_than(pool, cutoff).await {
        Ok(deleted) => {
            if deleted > 0 {
                tracing::info!(deleted, "Vital readings retention: purged old rows");
            } else {
                tracing::debug!("Vital readings retention: no rows to purge");
            }
            deleted
        }
        Err(e) => {
            tracing::error!(error = %e, "Vital readings retention: purge failed");
            0
        }
    }
}
