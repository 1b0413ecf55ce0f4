//! Stuck-request watchdog.
//!
//! Two sweeps on a timer:
//! - force `processing -> failed` for songs stuck past the processing
//!   timeout (an attempt that died mid-call, or a hung endpoint), and
//! - release stale claims on still-`queued` songs so a worker crash
//!   between claim and first transition gets re-driven.
//!
//! Both writes go through the same guarded transitions as the
//! orchestrator, so forcing a failure can never clobber a terminal row.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use odeon_db::repositories::SongRepo;

use crate::config::WorkerConfig;

/// Background watchdog over in-flight generations.
pub struct Watchdog {
    pool: PgPool,
    interval: Duration,
    processing_timeout_secs: i64,
    claim_timeout_secs: i64,
}

impl Watchdog {
    pub fn new(pool: PgPool, config: &WorkerConfig) -> Self {
        Self {
            pool,
            interval: Duration::from_secs(config.watchdog_interval_secs),
            processing_timeout_secs: config.processing_timeout_secs,
            claim_timeout_secs: config.claim_timeout_secs,
        }
    }

    /// Run the sweep loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            processing_timeout_secs = self.processing_timeout_secs,
            claim_timeout_secs = self.claim_timeout_secs,
            "Watchdog started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Watchdog shutting down");
                    break;
                }
                _ = ticker.tick() => self.sweep().await,
            }
        }
    }

    async fn sweep(&self) {
        match SongRepo::fail_stuck_processing(&self.pool, self.processing_timeout_secs).await {
            Ok(0) => {}
            Ok(count) => tracing::warn!(count, "Force-failed stuck processing songs"),
            Err(e) => tracing::error!(error = %e, "Stuck-processing sweep failed"),
        }

        match SongRepo::release_stale_claims(&self.pool, self.claim_timeout_secs).await {
            Ok(0) => {}
            Ok(count) => tracing::warn!(count, "Released stale claims for re-drive"),
            Err(e) => tracing::error!(error = %e, "Stale-claim sweep failed"),
        }
    }
}
