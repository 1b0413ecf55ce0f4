//! The job orchestrator: drives one claimed song from `queued` to a
//! terminal outcome.
//!
//! Per attempt the workflow:
//! 1. resolves the generation input shape from the re-read row,
//! 2. gates on the owner's current credit balance,
//! 3. marks the song `processing` (happens-before the outbound call),
//! 4. invokes the inference endpoint exactly once (journaled),
//! 5. commits the result — status and storage keys first, then category
//!    links, and the credit debit strictly last.
//!
//! Every failure settles the song into a terminal status visible to the
//! user; nothing escapes to a caller without a record of what happened.
//! A re-driven attempt that finds a terminal row stops without writing,
//! which bounds the crash window to "generated but not yet billed" —
//! never the reverse.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use odeon_core::error::CoreError;
use odeon_db::models::song::Song;
use odeon_db::models::status::SongStatus;
use odeon_db::repositories::{CategoryRepo, SongRepo, UserRepo};
use odeon_inference::{InferenceBackend, InferenceError};

use crate::steps::StepRunner;

/// Journal key for the inference invocation step.
const STEP_INVOKE_INFERENCE: &str = "invoke-inference";

/// Journal key for the credit debit step.
const STEP_DEDUCT_CREDITS: &str = "deduct-credits";

/// Infrastructure-level orchestration errors. Domain failures (bad input,
/// no credits, failed inference) do not surface here — they settle the
/// song instead.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Step journal payload corrupt: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Terminal outcome of one orchestration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    Failed,
    NoCredits,
    /// The song was already settled when this attempt looked at it
    /// (re-delivery after completion, or a watchdog force-fail).
    AlreadySettled,
}

/// Journaled result of the inference invocation step.
///
/// Both completions are recorded: a service-reported failure must not be
/// retried by a re-driven attempt any more than a success should be.
#[derive(Debug, Serialize, Deserialize)]
enum InferenceAttempt {
    Succeeded(odeon_inference::types::GenerationOutput),
    Failed { reason: String },
}

/// Drives claimed songs through the generation workflow.
pub struct Orchestrator {
    pool: PgPool,
    backend: Arc<dyn InferenceBackend>,
}

impl Orchestrator {
    pub fn new(pool: PgPool, backend: Arc<dyn InferenceBackend>) -> Self {
        Self { pool, backend }
    }

    /// Run one orchestration attempt to completion.
    ///
    /// Infrastructure faults are compensated with a terminal `failed`
    /// write before returning, so no song is left stranded in
    /// `processing` by a throwing workflow.
    pub async fn run(&self, song: Song) {
        let song_id = song.id;
        let owner_id = song.user_id;

        match self.drive(song).await {
            Ok(outcome) => {
                tracing::info!(song_id, owner_id, ?outcome, "Orchestration settled");
            }
            Err(e) => {
                tracing::error!(song_id, owner_id, error = %e, "Orchestration fault");
                match SongRepo::settle_failed(&self.pool, song_id).await {
                    Ok(true) => {
                        tracing::warn!(song_id, "Compensating transition to failed")
                    }
                    Ok(false) => {}
                    Err(e) => {
                        // The watchdog will force-fail the row once it
                        // exceeds the processing timeout.
                        tracing::error!(song_id, error = %e, "Compensating write failed");
                    }
                }
            }
        }
    }

    /// The workflow itself. Returns the terminal outcome, or an
    /// infrastructure error for [`run`] to compensate.
    async fn drive(&self, song: Song) -> Result<Outcome, OrchestrationError> {
        let song_id = song.id;
        let owner_id = song.user_id;
        let steps = StepRunner::new(&self.pool, song_id);

        // Step 1: resolve inputs from the re-read row. An unresolvable
        // shape is fatal and unretryable; the request fails immediately.
        let input = match song.generation_input() {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(song_id, error = %e, "No generation input shape resolved");
                SongRepo::settle_failed(&self.pool, song_id).await?;
                return Ok(Outcome::Failed);
            }
        };
        let params = song.generation_params();

        // Step 2: credit gate against the owner's current balance. No
        // inference call is made and no credit is touched.
        let credits = UserRepo::credits_of(&self.pool, owner_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: owner_id,
            })?;
        if credits <= 0 {
            tracing::info!(song_id, owner_id, credits, "Owner has no credits");
            SongRepo::settle_no_credits(&self.pool, song_id).await?;
            return Ok(Outcome::NoCredits);
        }

        // Step 3: mark processing before the outbound call. A refused
        // transition means either a resumed attempt (already processing)
        // or a settled row (stop without writing).
        if !SongRepo::mark_processing(&self.pool, song_id).await? {
            let current = SongRepo::find_by_id(&self.pool, song_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Song",
                    id: song_id,
                })?;
            if current.status_id != SongStatus::Processing.id() {
                tracing::warn!(
                    song_id,
                    status_id = current.status_id,
                    "Song already settled; skipping attempt",
                );
                return Ok(Outcome::AlreadySettled);
            }
            tracing::info!(song_id, "Resuming an interrupted attempt");
        }

        // Step 4: invoke inference, journaled so a resumed attempt
        // replays the recorded completion instead of calling again.
        let backend = Arc::clone(&self.backend);
        let attempt = steps
            .run(STEP_INVOKE_INFERENCE, || async move {
                match backend.generate(&input, &params).await {
                    Ok(output) => Ok(InferenceAttempt::Succeeded(output)),
                    Err(e) => Ok(InferenceAttempt::Failed {
                        reason: e.to_string(),
                    }),
                }
            })
            .await?;

        // Step 5: commit the result.
        let output = match attempt {
            InferenceAttempt::Succeeded(output) => output,
            InferenceAttempt::Failed { reason } => {
                tracing::warn!(song_id, reason = %reason, "Inference attempt failed");
                SongRepo::settle_failed(&self.pool, song_id).await?;
                return Ok(Outcome::Failed);
            }
        };

        // Status and storage keys first. If the transition is refused the
        // row was force-failed underneath us (watchdog); do not tag or bill.
        let committed = SongRepo::settle_processed(
            &self.pool,
            song_id,
            &output.storage_key,
            &output.thumbnail_storage_key,
        )
        .await?;
        if !committed {
            tracing::warn!(song_id, "Row settled externally before commit");
            return Ok(Outcome::AlreadySettled);
        }

        // Category links, idempotent on both the name and the pair.
        let categories =
            CategoryRepo::resolve_or_create_all(&self.pool, &output.categories).await?;
        for category in &categories {
            CategoryRepo::link_song(&self.pool, song_id, category.id).await?;
        }

        // Credit debit strictly last, and journaled: a re-driven commit
        // never charges twice.
        let required = song.required_credits;
        let pool = self.pool.clone();
        let charged = steps
            .run(STEP_DEDUCT_CREDITS, || async move {
                Ok(UserRepo::debit_credits(&pool, owner_id, required).await?)
            })
            .await?;
        if !charged {
            // Balance fell below the captured cost between the gate and
            // here. The song stays processed; err on under-billing.
            tracing::warn!(song_id, owner_id, required, "Debit skipped: balance too low");
        }

        tracing::info!(
            song_id,
            owner_id,
            categories = categories.len(),
            charged,
            "Generation committed",
        );
        Ok(Outcome::Processed)
    }
}
