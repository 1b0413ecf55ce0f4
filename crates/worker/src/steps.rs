//! Durable step runner.
//!
//! Side-effecting orchestration steps are journaled in the
//! `workflow_steps` table keyed by `(song_id, step)`. Running a step
//! first consults the journal: a recorded step replays its payload
//! instead of executing again, so a re-driven attempt never repeats an
//! external effect that already completed (most importantly the
//! inference call and the credit debit).

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;

use odeon_core::types::DbId;
use odeon_db::repositories::WorkflowStepRepo;

use crate::orchestrator::OrchestrationError;

/// Journal-backed step execution for one song's workflow.
pub struct StepRunner<'a> {
    pool: &'a PgPool,
    song_id: DbId,
}

impl<'a> StepRunner<'a> {
    pub fn new(pool: &'a PgPool, song_id: DbId) -> Self {
        Self { pool, song_id }
    }

    /// Execute `step` at most once, journaling its result.
    ///
    /// If the journal already holds a payload for this step, it is
    /// deserialized and returned without running `f`. Otherwise `f` runs;
    /// on success its result is recorded and returned. A step that errors
    /// is not recorded, so the next drive retries it.
    pub async fn run<T, F, Fut>(&self, step: &str, f: F) -> Result<T, OrchestrationError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, OrchestrationError>>,
    {
        if let Some(recorded) = WorkflowStepRepo::find(self.pool, self.song_id, step).await? {
            tracing::debug!(
                song_id = self.song_id,
                step,
                "Replaying journaled step result",
            );
            return Ok(serde_json::from_value(recorded.payload)?);
        }

        let result = f().await?;

        let payload = serde_json::to_value(&result)?;
        let recorded = WorkflowStepRepo::record(self.pool, self.song_id, step, &payload).await?;

        // A concurrent attempt may have journaled first; its payload is
        // authoritative.
        Ok(serde_json::from_value(recorded.payload)?)
    }
}
