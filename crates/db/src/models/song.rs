//! Song entity model and DTOs.

use odeon_core::error::CoreError;
use odeon_core::generation::{GenerationInput, GenerationParams};
use odeon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::status::StatusId;

/// A row from the `songs` table.
///
/// Created by user action in `queued` status; mutated only by the
/// orchestrator afterwards (apart from the owner's `published` toggle and
/// the playback gate's `listen_count` increment). Never deleted here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Song {
    pub id: DbId,
    pub title: String,
    pub user_id: DbId,
    pub status_id: StatusId,
    pub instrumental: bool,
    pub prompt: Option<String>,
    pub lyrics: Option<String>,
    pub full_described_song: Option<String>,
    pub described_lyrics: Option<String>,
    pub guidance_scale: Option<f64>,
    pub infer_step: Option<f64>,
    pub audio_duration: Option<f64>,
    pub seed: Option<f64>,
    pub storage_key: Option<String>,
    pub thumbnail_storage_key: Option<String>,
    pub required_credits: i32,
    pub published: bool,
    pub listen_count: i32,
    pub claimed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Song {
    /// Resolve the generation input shape from the stored fields.
    pub fn generation_input(&self) -> Result<GenerationInput, CoreError> {
        GenerationInput::resolve(
            self.full_described_song.as_deref(),
            self.prompt.as_deref(),
            self.lyrics.as_deref(),
            self.described_lyrics.as_deref(),
        )
    }

    /// Pass-through generation parameters stored on the row.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            guidance_scale: self.guidance_scale,
            infer_step: self.infer_step,
            audio_duration: self.audio_duration,
            seed: self.seed,
            instrumental: Some(self.instrumental),
        }
    }
}

/// DTO for enqueueing a new song via `POST /api/v1/songs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSong {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    pub instrumental: Option<bool>,
    pub prompt: Option<String>,
    pub lyrics: Option<String>,
    pub full_described_song: Option<String>,
    pub described_lyrics: Option<String>,
    pub guidance_scale: Option<f64>,
    pub infer_step: Option<f64>,
    pub audio_duration: Option<f64>,
    pub seed: Option<f64>,
}

impl CreateSong {
    /// Resolve the generation input shape from the submitted fields.
    ///
    /// Called at enqueue time so an unresolvable submission is rejected
    /// before any row is created.
    pub fn generation_input(&self) -> Result<GenerationInput, CoreError> {
        GenerationInput::resolve(
            self.full_described_song.as_deref(),
            self.prompt.as_deref(),
            self.lyrics.as_deref(),
            self.described_lyrics.as_deref(),
        )
    }
}

/// Query parameters for `GET /api/v1/songs`.
#[derive(Debug, Deserialize)]
pub struct SongListQuery {
    /// Filter by status ID.
    pub status_id: Option<StatusId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
