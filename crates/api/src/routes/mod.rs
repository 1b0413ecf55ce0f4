pub mod health;
pub mod songs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /songs                      enqueue (POST), list own (GET)
/// /songs/explore              published songs, most listened first (GET)
/// /songs/{id}                 song detail with categories (GET)
/// /songs/{id}/status          lifecycle status polling (GET)
/// /songs/{id}/play            presigned playback URL (GET)
/// /songs/{id}/publish         toggle published flag (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/songs", songs::router())
}
