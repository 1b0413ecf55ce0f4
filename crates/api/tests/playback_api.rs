//! Integration tests for the playback gate.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, seed_user_with_token};
use sqlx::PgPool;

use odeon_core::types::DbId;
use odeon_db::models::song::CreateSong;
use odeon_db::models::status::SongStatus;
use odeon_db::repositories::SongRepo;

/// Seed a song directly in the store with the given status and key.
async fn seed_song(
    pool: &PgPool,
    user_id: DbId,
    status: SongStatus,
    published: bool,
    storage_key: Option<&str>,
) -> DbId {
    let input = CreateSong {
        title: "seeded".to_string(),
        instrumental: None,
        prompt: None,
        lyrics: None,
        full_described_song: Some("a seeded song".to_string()),
        described_lyrics: None,
        guidance_scale: None,
        infer_step: None,
        audio_duration: None,
        seed: None,
    };
    let song = SongRepo::create(pool, user_id, &input, 80).await.unwrap();

    sqlx::query(
        "UPDATE songs SET status_id = $2, published = $3, storage_key = $4 WHERE id = $1",
    )
    .bind(song.id)
    .bind(status.id())
    .bind(published)
    .bind(storage_key)
    .execute(pool)
    .await
    .unwrap();

    song.id
}

#[sqlx::test(migrations = "../../migrations")]
async fn owner_gets_playback_url_and_listen_is_counted(pool: PgPool) {
    let (user_id, token) = seed_user_with_token(&pool, "alice", 100).await;
    let song_id = seed_song(&pool, user_id, SongStatus::Processed, false, Some("audio/a.wav")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/songs/{song_id}/play"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["url"], "https://storage.test/audio/a.wav?signed=1");

    let listen_count: i32 =
        sqlx::query_scalar("SELECT listen_count FROM songs WHERE id = $1")
            .bind(song_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(listen_count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn each_issued_link_counts_as_a_listen(pool: PgPool) {
    let (user_id, token) = seed_user_with_token(&pool, "alice", 100).await;
    let song_id = seed_song(&pool, user_id, SongStatus::Processed, false, Some("audio/a.wav")).await;

    for _ in 0..3 {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &format!("/api/v1/songs/{song_id}/play"), &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let listen_count: i32 =
        sqlx::query_scalar("SELECT listen_count FROM songs WHERE id = $1")
            .bind(song_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(listen_count, 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn stranger_plays_published_song(pool: PgPool) {
    let (alice_id, _) = seed_user_with_token(&pool, "alice", 100).await;
    let (_, bob_token) = seed_user_with_token(&pool, "bob", 100).await;
    let song_id = seed_song(&pool, alice_id, SongStatus::Processed, true, Some("audio/a.wav")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/songs/{song_id}/play"), &bob_token).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn stranger_denied_on_unpublished_song(pool: PgPool) {
    let (alice_id, _) = seed_user_with_token(&pool, "alice", 100).await;
    let (_, bob_token) = seed_user_with_token(&pool, "bob", 100).await;
    let song_id =
        seed_song(&pool, alice_id, SongStatus::Processed, false, Some("audio/a.wav")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/songs/{song_id}/play"), &bob_token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");

    // A denied request never counts a listen.
    let listen_count: i32 =
        sqlx::query_scalar("SELECT listen_count FROM songs WHERE id = $1")
            .bind(song_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(listen_count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unfinished_song_returns_409_not_ready(pool: PgPool) {
    let (user_id, token) = seed_user_with_token(&pool, "alice", 100).await;

    for status in [SongStatus::Queued, SongStatus::Processing] {
        let song_id = seed_song(&pool, user_id, status, false, None).await;

        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &format!("/api/v1/songs/{song_id}/play"), &token).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_READY");
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn processed_song_without_key_returns_500(pool: PgPool) {
    let (user_id, token) = seed_user_with_token(&pool, "alice", 100).await;
    let song_id = seed_song(&pool, user_id, SongStatus::Processed, false, None).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/songs/{song_id}/play"), &token).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_KEY_MISSING");
}

#[sqlx::test(migrations = "../../migrations")]
async fn missing_song_returns_404(pool: PgPool) {
    let (_, token) = seed_user_with_token(&pool, "alice", 100).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/songs/999/play", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
