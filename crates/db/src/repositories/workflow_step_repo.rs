//! Repository for the `workflow_steps` table — the orchestrator's durable
//! step log.

use sqlx::PgPool;

use odeon_core::types::DbId;

use crate::models::workflow_step::WorkflowStep;

/// Column list for `workflow_steps` queries.
const COLUMNS: &str = "id, song_id, step, payload, completed_at";

/// Provides the write-ahead step log used for resumable orchestration.
pub struct WorkflowStepRepo;

impl WorkflowStepRepo {
    /// Find a previously recorded step for a song.
    pub async fn find(
        pool: &PgPool,
        song_id: DbId,
        step: &str,
    ) -> Result<Option<WorkflowStep>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_steps WHERE song_id = $1 AND step = $2");
        sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(song_id)
            .bind(step)
            .fetch_optional(pool)
            .await
    }

    /// Record a completed step with its payload.
    ///
    /// Idempotent: if the step is already recorded (a concurrent or
    /// re-driven attempt got there first), the first writer's payload wins
    /// and is returned.
    pub async fn record(
        pool: &PgPool,
        song_id: DbId,
        step: &str,
        payload: &serde_json::Value,
    ) -> Result<WorkflowStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_steps (song_id, step, payload) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (song_id, step) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, WorkflowStep>(&query)
            .bind(song_id)
            .bind(step)
            .bind(payload)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(row) => Ok(row),
            // Lost the insert race; the existing row is authoritative.
            None => Self::find(pool, song_id, step)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }
}
