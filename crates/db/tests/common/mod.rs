//! Shared fixtures for db integration tests.

use sqlx::PgPool;

use odeon_core::types::DbId;
use odeon_db::models::song::{CreateSong, Song};
use odeon_db::models::user::CreateUser;
use odeon_db::repositories::{SongRepo, UserRepo};

/// Seed a user with the given credit balance, returning its id.
pub async fn seed_user(pool: &PgPool, name: &str, credits: i32) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            credits: Some(credits),
        },
    )
    .await
    .expect("seed user");
    user.id
}

/// Seed a queued full-description song for `user_id`.
pub async fn seed_song(pool: &PgPool, user_id: DbId, title: &str) -> Song {
    let input = CreateSong {
        title: title.to_string(),
        instrumental: None,
        prompt: None,
        lyrics: None,
        full_described_song: Some("an upbeat test jingle".to_string()),
        described_lyrics: None,
        guidance_scale: None,
        infer_step: None,
        audio_duration: None,
        seed: None,
    };
    let required = input.generation_input().unwrap().required_credits();
    SongRepo::create(pool, user_id, &input, required)
        .await
        .expect("seed song")
}
