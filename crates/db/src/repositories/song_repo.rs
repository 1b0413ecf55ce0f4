//! Repository for the `songs` table.
//!
//! Every lifecycle transition is a guarded UPDATE (`WHERE status_id = ...`)
//! returning whether the row actually moved, so terminal statuses are
//! immutable at the store level no matter who drives the transition.

use sqlx::PgPool;

use odeon_core::types::DbId;

use crate::models::song::{CreateSong, Song, SongListQuery};
use crate::models::status::SongStatus;

/// Column list for `songs` queries.
const COLUMNS: &str = "\
    id, title, user_id, status_id, instrumental, \
    prompt, lyrics, full_described_song, described_lyrics, \
    guidance_scale, infer_step, audio_duration, seed, \
    storage_key, thumbnail_storage_key, required_credits, \
    published, listen_count, claimed_at, created_at, updated_at";

/// Maximum page size for song listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for song listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD and lifecycle operations for songs.
pub struct SongRepo;

impl SongRepo {
    /// Insert a new song in `queued` status, returning the created row.
    ///
    /// `required_credits` is captured here, at submission time; the
    /// orchestrator debits exactly this amount on success.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSong,
        required_credits: i32,
    ) -> Result<Song, sqlx::Error> {
        let query = format!(
            "INSERT INTO songs \
                 (title, user_id, status_id, instrumental, prompt, lyrics, \
                  full_described_song, described_lyrics, guidance_scale, \
                  infer_step, audio_duration, seed, required_credits) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(&input.title)
            .bind(user_id)
            .bind(SongStatus::Queued.id())
            .bind(input.instrumental.unwrap_or(false))
            .bind(&input.prompt)
            .bind(&input.lyrics)
            .bind(&input.full_described_song)
            .bind(&input.described_lyrics)
            .bind(input.guidance_scale)
            .bind(input.infer_step)
            .bind(input.audio_duration)
            .bind(input.seed)
            .bind(required_credits)
            .fetch_one(pool)
            .await
    }

    /// Find a song by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Song>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM songs WHERE id = $1");
        sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim the next queued song whose owner has no other
    /// claimed, unsettled song.
    ///
    /// This is the per-owner serialization point: concurrent requests from
    /// one owner queue strictly FIFO (`ORDER BY created_at`), while songs
    /// from different owners claim freely in parallel. Uses
    /// `FOR UPDATE SKIP LOCKED` so a second dispatcher instance never
    /// double-claims the same row.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<Song>, sqlx::Error> {
        let query = format!(
            "UPDATE songs \
             SET claimed_at = NOW(), updated_at = NOW() \
             WHERE id = ( \
                 SELECT s.id FROM songs s \
                 WHERE s.status_id = $1 AND s.claimed_at IS NULL \
                   AND NOT EXISTS ( \
                       SELECT 1 FROM songs b \
                       WHERE b.user_id = s.user_id \
                         AND b.claimed_at IS NOT NULL \
                         AND b.status_id IN ($1, $2) \
                   ) \
                 ORDER BY s.created_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(SongStatus::Queued.id())
            .bind(SongStatus::Processing.id())
            .fetch_optional(pool)
            .await
    }

    /// Release claims on `queued` songs that were claimed longer than
    /// `max_age_secs` ago but never started processing (worker crashed
    /// between claim and the first transition). Returns the release count.
    pub async fn release_stale_claims(
        pool: &PgPool,
        max_age_secs: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs \
             SET claimed_at = NULL, updated_at = NOW() \
             WHERE status_id = $1 AND claimed_at IS NOT NULL \
               AND claimed_at < NOW() - make_interval(secs => $2)",
        )
        .bind(SongStatus::Queued.id())
        .bind(max_age_secs as f64)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Transition `queued -> processing`. Returns `false` if the song was
    /// not in `queued` (already picked up, or settled).
    ///
    /// This write happens-before the outbound inference call, so a reader
    /// never observes `queued` concurrently with an in-flight call and a
    /// crash after this point is distinguishable from "never started".
    pub async fn mark_processing(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs SET status_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(SongStatus::Processing.id())
        .bind(SongStatus::Queued.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Settle a song as `no_credits`. Terminal; no inference call was made.
    pub async fn settle_no_credits(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        Self::settle(pool, id, SongStatus::NoCredits).await
    }

    /// Settle a song as `failed`. Terminal. Also the compensating write
    /// used when the orchestration itself faults mid-flight.
    pub async fn settle_failed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        Self::settle(pool, id, SongStatus::Failed).await
    }

    /// Guarded transition into a terminal status. Only non-terminal rows
    /// move; settling an already-settled song is a no-op returning `false`.
    async fn settle(pool: &PgPool, id: DbId, status: SongStatus) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs SET status_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status_id IN ($3, $4)",
        )
        .bind(id)
        .bind(status.id())
        .bind(SongStatus::Queued.id())
        .bind(SongStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Commit a successful generation: write both storage keys and
    /// transition `processing -> processed`.
    pub async fn settle_processed(
        pool: &PgPool,
        id: DbId,
        storage_key: &str,
        thumbnail_storage_key: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs \
             SET status_id = $2, storage_key = $3, thumbnail_storage_key = $4, \
                 updated_at = NOW() \
             WHERE id = $1 AND status_id = $5",
        )
        .bind(id)
        .bind(SongStatus::Processed.id())
        .bind(storage_key)
        .bind(thumbnail_storage_key)
        .bind(SongStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Watchdog sweep: force `processing -> failed` for songs stuck in
    /// `processing` longer than `max_age_secs`. Returns the failed count.
    pub async fn fail_stuck_processing(
        pool: &PgPool,
        max_age_secs: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs SET status_id = $1, updated_at = NOW() \
             WHERE status_id = $2 \
               AND updated_at < NOW() - make_interval(secs => $3)",
        )
        .bind(SongStatus::Failed.id())
        .bind(SongStatus::Processing.id())
        .bind(max_age_secs as f64)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Increment `listen_count` by exactly 1. Counts links issued by the
    /// playback gate, not completed plays.
    pub async fn increment_listen_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE songs SET listen_count = listen_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Toggle `published` for a song the caller owns. Returns `false` if
    /// the song does not exist or is not owned by `owner_id`.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        published: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs SET published = $3, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(published)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rename a song the caller owns. Returns `false` if the song does not
    /// exist or is not owned by `owner_id`.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        title: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE songs SET title = $3, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(title)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a user's songs, newest first, with optional status filter.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        params: &SongListQuery,
    ) -> Result<Vec<Song>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        match params.status_id {
            Some(status_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM songs \
                     WHERE user_id = $1 AND status_id = $2 \
                     ORDER BY created_at DESC \
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Song>(&query)
                    .bind(user_id)
                    .bind(status_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM songs \
                     WHERE user_id = $1 \
                     ORDER BY created_at DESC \
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Song>(&query)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// List published, processed songs for the explore page, most listened
    /// first.
    pub async fn list_published(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Song>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM songs \
             WHERE published = true AND status_id = $1 \
             ORDER BY listen_count DESC, created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(SongStatus::Processed.id())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
