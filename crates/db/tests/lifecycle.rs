//! Song lifecycle transition tests: the state machine is enforced by
//! guarded updates, so terminal statuses are immutable no matter which
//! actor drives the transition.

mod common;

use sqlx::PgPool;

use common::{seed_song, seed_user};
use odeon_db::models::status::SongStatus;
use odeon_db::repositories::{SongRepo, UserRepo};

#[sqlx::test(migrations = "../../migrations")]
async fn songs_are_born_queued(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 100).await;
    let song = seed_song(&pool, user_id, "first").await;

    assert_eq!(song.status_id, SongStatus::Queued.id());
    assert_eq!(song.listen_count, 0);
    assert!(!song.published);
    assert!(song.storage_key.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_processing_only_moves_queued_rows(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 100).await;
    let song = seed_song(&pool, user_id, "first").await;

    assert!(SongRepo::mark_processing(&pool, song.id).await.unwrap());
    // Second attempt is a no-op: the row is no longer queued.
    assert!(!SongRepo::mark_processing(&pool, song.id).await.unwrap());

    let song = SongRepo::find_by_id(&pool, song.id).await.unwrap().unwrap();
    assert_eq!(song.status_id, SongStatus::Processing.id());
}

#[sqlx::test(migrations = "../../migrations")]
async fn terminal_statuses_never_change_again(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 100).await;
    let song = seed_song(&pool, user_id, "first").await;

    SongRepo::mark_processing(&pool, song.id).await.unwrap();
    assert!(
        SongRepo::settle_processed(&pool, song.id, "audio/1.wav", "thumbs/1.png")
            .await
            .unwrap()
    );

    // Every further transition bounces off the terminal row.
    assert!(!SongRepo::settle_failed(&pool, song.id).await.unwrap());
    assert!(!SongRepo::settle_no_credits(&pool, song.id).await.unwrap());
    assert!(!SongRepo::mark_processing(&pool, song.id).await.unwrap());
    assert!(
        !SongRepo::settle_processed(&pool, song.id, "audio/2.wav", "thumbs/2.png")
            .await
            .unwrap()
    );

    let song = SongRepo::find_by_id(&pool, song.id).await.unwrap().unwrap();
    assert_eq!(song.status_id, SongStatus::Processed.id());
    assert_eq!(song.storage_key.as_deref(), Some("audio/1.wav"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn settle_processed_requires_processing(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 100).await;
    let song = seed_song(&pool, user_id, "first").await;

    // Still queued: a success commit without the processing step is refused.
    assert!(
        !SongRepo::settle_processed(&pool, song.id, "audio/1.wav", "thumbs/1.png")
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn no_credits_settles_directly_from_queued(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 0).await;
    let song = seed_song(&pool, user_id, "first").await;

    assert!(SongRepo::settle_no_credits(&pool, song.id).await.unwrap());
    let song = SongRepo::find_by_id(&pool, song.id).await.unwrap().unwrap();
    assert_eq!(song.status_id, SongStatus::NoCredits.id());
}

#[sqlx::test(migrations = "../../migrations")]
async fn watchdog_fails_stuck_processing_rows(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 100).await;
    let stuck = seed_song(&pool, user_id, "stuck").await;
    SongRepo::mark_processing(&pool, stuck.id).await.unwrap();

    // Nothing is old enough yet.
    assert_eq!(SongRepo::fail_stuck_processing(&pool, 3600).await.unwrap(), 0);

    // Backdate the row, then sweep.
    sqlx::query("UPDATE songs SET updated_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(stuck.id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(SongRepo::fail_stuck_processing(&pool, 1800).await.unwrap(), 1);

    let song = SongRepo::find_by_id(&pool, stuck.id).await.unwrap().unwrap();
    assert_eq!(song.status_id, SongStatus::Failed.id());
}

#[sqlx::test(migrations = "../../migrations")]
async fn debit_never_drives_credits_negative(pool: PgPool) {
    let user_id = seed_user(&pool, "alice", 100).await;

    assert!(UserRepo::debit_credits(&pool, user_id, 80).await.unwrap());
    assert_eq!(UserRepo::credits_of(&pool, user_id).await.unwrap(), Some(20));

    // Balance below the amount: nothing is charged.
    assert!(!UserRepo::debit_credits(&pool, user_id, 80).await.unwrap());
    assert_eq!(UserRepo::credits_of(&pool, user_id).await.unwrap(), Some(20));
}

#[sqlx::test(migrations = "../../migrations")]
async fn publish_toggle_is_owner_scoped(pool: PgPool) {
    let alice = seed_user(&pool, "alice", 100).await;
    let mallory = seed_user(&pool, "mallory", 100).await;
    let song = seed_song(&pool, alice, "mine").await;

    assert!(!SongRepo::set_published(&pool, song.id, mallory, true)
        .await
        .unwrap());
    assert!(SongRepo::set_published(&pool, song.id, alice, true)
        .await
        .unwrap());

    let song = SongRepo::find_by_id(&pool, song.id).await.unwrap().unwrap();
    assert!(song.published);
}
