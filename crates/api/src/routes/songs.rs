use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{playback, songs};
use crate::state::AppState;

/// Mount the `/songs` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(songs::create_song).get(songs::list_songs))
        .route("/explore", get(songs::explore_songs))
        .route("/{id}", get(songs::get_song))
        .route("/{id}/status", get(songs::get_song_status))
        .route("/{id}/play", get(playback::get_play_url))
        .route("/{id}/publish", patch(songs::set_published))
        .route("/{id}/rename", patch(songs::rename_song))
}
