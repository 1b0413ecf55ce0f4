//! Background claim dispatcher.
//!
//! A single long-lived Tokio task that polls for claimable songs and
//! spawns one orchestration task per claim. Claims are taken serially by
//! this loop, and [`SongRepo::claim_next`] refuses a song whose owner
//! already has a claimed, unsettled song — together these enforce the
//! at-most-one-in-flight-per-owner policy while keeping unrelated owners
//! fully parallel.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use odeon_db::repositories::SongRepo;

use crate::orchestrator::Orchestrator;

/// Background song dispatcher.
pub struct Dispatcher {
    pool: PgPool,
    orchestrator: Arc<Orchestrator>,
    poll_interval: Duration,
}

impl Dispatcher {
    pub fn new(pool: PgPool, orchestrator: Arc<Orchestrator>, poll_interval: Duration) -> Self {
        Self {
            pool,
            orchestrator,
            poll_interval,
        }
    }

    /// Run the dispatch loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Dispatcher started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.try_dispatch().await {
                        tracing::error!(error = %e, "Dispatch cycle failed");
                    }
                }
            }
        }
    }

    /// One dispatch cycle: claim every currently claimable song and spawn
    /// an orchestration task for each.
    async fn try_dispatch(&self) -> Result<(), sqlx::Error> {
        while let Some(song) = SongRepo::claim_next(&self.pool).await? {
            tracing::info!(
                song_id = song.id,
                owner_id = song.user_id,
                "Song claimed for orchestration",
            );
            let orchestrator = Arc::clone(&self.orchestrator);
            tokio::spawn(async move {
                orchestrator.run(song).await;
            });
        }
        Ok(())
    }
}
