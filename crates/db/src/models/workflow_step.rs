//! Workflow step log model.

use odeon_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `workflow_steps` table: one completed, side-effecting
/// orchestration step with its recorded result payload.
///
/// Unique on `(song_id, step)` — recording a step is idempotent, and a
/// re-driven orchestration replays the payload instead of re-executing.
#[derive(Debug, Clone, FromRow)]
pub struct WorkflowStep {
    pub id: DbId,
    pub song_id: DbId,
    pub step: String,
    pub payload: serde_json::Value,
    pub completed_at: Timestamp,
}
