//! The playback gate: exchange a song for a short-lived streaming URL.
//!
//! Access is granted to the owner always, and to anyone else only once the
//! song is published. The gate refuses with a distinct error for each
//! failure mode so the client can render the right message: missing song,
//! denied access, generation not finished, or a processed song whose key
//! went missing.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use odeon_core::error::CoreError;
use odeon_core::types::DbId;
use odeon_db::models::song::Song;
use odeon_db::models::status::SongStatus;
use odeon_db::repositories::SongRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Playback response payload.
#[derive(Debug, Serialize)]
pub struct PlayUrlResponse {
    /// Presigned, time-limited streaming URL.
    pub url: String,
}

/// Decide whether `user_id` may play `song`, returning the storage key to
/// presign.
///
/// Checked in order: access first (an unpublished song must look the same
/// to a stranger whatever its status), then readiness, then key presence.
fn authorize_playback(song: &Song, user_id: DbId) -> Result<&str, CoreError> {
    if song.user_id != user_id && !song.published {
        return Err(CoreError::Forbidden(
            "Cannot play another user's unpublished song".into(),
        ));
    }

    if song.status_id != SongStatus::Processed.id() {
        return Err(CoreError::NotReady {
            entity: "Song",
            id: song.id,
        });
    }

    song.storage_key
        .as_deref()
        .ok_or(CoreError::StorageKeyMissing { id: song.id })
}

/// GET /api/v1/songs/{id}/play
///
/// Issue a presigned playback URL and count the listen. The counter tracks
/// issued links; an abandoned link still counts.
pub async fn get_play_url(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(song_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let song = SongRepo::find_by_id(&state.pool, song_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Song",
            id: song_id,
        }))?;

    let key = authorize_playback(&song, auth.user_id)?.to_string();

    let ttl = Duration::from_secs(state.config.playback_url_ttl_secs);
    let url = state.storage.presign_get(&key, ttl).await?;

    SongRepo::increment_listen_count(&state.pool, song.id).await?;

    tracing::info!(song_id, user_id = auth.user_id, "Playback URL issued");

    Ok(Json(DataResponse {
        data: PlayUrlResponse { url },
    }))
}
