//! Handlers for the `/songs` resource.
//!
//! Submission enqueues a row in `queued` status and returns immediately;
//! the worker drives it to a terminal status out of process. All endpoints
//! except `/songs/explore` operate on the caller's own songs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use odeon_core::error::CoreError;
use odeon_core::types::DbId;
use odeon_db::models::song::{CreateSong, Song, SongListQuery};
use odeon_db::models::status::SongStatus;
use odeon_db::repositories::{CategoryRepo, SongRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a song by ID and verify the caller may see it: the owner always,
/// anyone else only once it is published.
///
/// Returns `NotFound` for a missing song and `Forbidden` for an
/// unpublished song the caller does not own.
async fn find_and_authorize(
    pool: &sqlx::PgPool,
    song_id: DbId,
    auth: &AuthUser,
) -> AppResult<Song> {
    let song = SongRepo::find_by_id(pool, song_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Song",
            id: song_id,
        }))?;

    if song.user_id != auth.user_id && !song.published {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot access another user's unpublished song".into(),
        )));
    }

    Ok(song)
}

/// A song with its linked category names, for detail responses.
#[derive(Debug, Serialize)]
pub struct SongDetail {
    #[serde(flatten)]
    pub song: Song,
    pub categories: Vec<String>,
}

async fn with_categories(pool: &sqlx::PgPool, song: Song) -> AppResult<SongDetail> {
    let categories = CategoryRepo::list_for_song(pool, song.id)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    Ok(SongDetail { song, categories })
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/songs
///
/// Enqueue a new generation request. The input must resolve to exactly one
/// of the three generation shapes; the credit cost is captured here and
/// debited by the worker only on success. Returns 201 with the queued song.
pub async fn create_song(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSong>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    // Reject unresolvable submissions before a row exists; the same
    // resolution runs again in the worker against the stored row.
    let shape = input.generation_input()?;
    let required_credits = shape.required_credits();

    let song = SongRepo::create(&state.pool, auth.user_id, &input, required_credits).await?;

    tracing::info!(
        song_id = song.id,
        user_id = auth.user_id,
        required_credits,
        "Song enqueued",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: song })))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/songs
///
/// List the caller's own songs, newest first. Supports optional
/// `status_id`, `limit`, and `offset` query parameters.
pub async fn list_songs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SongListQuery>,
) -> AppResult<impl IntoResponse> {
    let songs = SongRepo::list_by_user(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data: songs }))
}

/// Query parameters for `GET /api/v1/songs/explore`.
#[derive(Debug, Deserialize)]
pub struct ExploreQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// An explore-page entry: the song plus its categories and a presigned
/// cover image URL.
#[derive(Debug, Serialize)]
pub struct ExploreSong {
    #[serde(flatten)]
    pub song: Song,
    pub categories: Vec<String>,
    pub thumbnail_url: Option<String>,
}

/// GET /api/v1/songs/explore
///
/// List published, processed songs from all users, most listened first.
pub async fn explore_songs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExploreQuery>,
) -> AppResult<impl IntoResponse> {
    let songs = SongRepo::list_published(&state.pool, params.limit, params.offset).await?;
    let ttl = std::time::Duration::from_secs(state.config.playback_url_ttl_secs);

    let mut entries = Vec::with_capacity(songs.len());
    for song in songs {
        let categories = CategoryRepo::list_for_song(&state.pool, song.id)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();

        // Cover images are cosmetic; a presign failure hides the image
        // rather than failing the whole page.
        let thumbnail_url = match &song.thumbnail_storage_key {
            Some(key) => match state.storage.presign_get(key, ttl).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(song_id = song.id, error = %e, "Thumbnail presign failed");
                    None
                }
            },
            None => None,
        };

        entries.push(ExploreSong {
            song,
            categories,
            thumbnail_url,
        });
    }

    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/songs/{id}
///
/// Get a single song with its category names. Owners see their own songs
/// in any status; everyone else only published ones.
pub async fn get_song(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(song_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let song = find_and_authorize(&state.pool, song_id, &auth).await?;
    let detail = with_categories(&state.pool, song).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// Status polling response payload.
#[derive(Debug, Serialize)]
pub struct SongStatusResponse {
    pub song_id: DbId,
    pub status: &'static str,
}

/// GET /api/v1/songs/{id}/status
///
/// Lightweight polling endpoint returning only the lifecycle status name.
pub async fn get_song_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(song_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let song = find_and_authorize(&state.pool, song_id, &auth).await?;

    let status = SongStatus::from_id(song.status_id)
        .ok_or_else(|| CoreError::Internal(format!("Unknown status id {}", song.status_id)))?;

    Ok(Json(DataResponse {
        data: SongStatusResponse {
            song_id: song.id,
            status: status.name(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Rename
// ---------------------------------------------------------------------------

/// Request body for `PATCH /api/v1/songs/{id}/rename`.
#[derive(Debug, Deserialize, Validate)]
pub struct RenameSong {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
}

/// PATCH /api/v1/songs/{id}/rename
///
/// Rename a song. Owner only; like the publish toggle, the update is
/// scoped to the caller's songs so someone else's song id behaves like a
/// missing one.
pub async fn rename_song(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(song_id): Path<DbId>,
    Json(input): Json<RenameSong>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let updated = SongRepo::rename(&state.pool, song_id, auth.user_id, &input.title).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Song",
            id: song_id,
        }));
    }

    tracing::info!(song_id, user_id = auth.user_id, "Song renamed");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

/// Request body for `PATCH /api/v1/songs/{id}/publish`.
#[derive(Debug, Deserialize)]
pub struct SetPublished {
    pub published: bool,
}

/// PATCH /api/v1/songs/{id}/publish
///
/// Toggle a song's published flag. Owner only; the update is scoped to the
/// caller's songs so someone else's song id behaves like a missing one.
pub async fn set_published(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(song_id): Path<DbId>,
    Json(input): Json<SetPublished>,
) -> AppResult<impl IntoResponse> {
    let updated =
        SongRepo::set_published(&state.pool, song_id, auth.user_id, input.published).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Song",
            id: song_id,
        }));
    }

    tracing::info!(
        song_id,
        user_id = auth.user_id,
        published = input.published,
        "Song publish flag updated",
    );

    Ok(StatusCode::NO_CONTENT)
}
