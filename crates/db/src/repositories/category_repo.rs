//! Repository for the `categories` and `song_categories` tables.
//!
//! Category names are free text produced by the inference service.
//! Unrelated owners' workflows race to create the same name concurrently,
//! so creation goes through `ON CONFLICT` — the loser of the race lands on
//! the existing row instead of erroring or duplicating.

use sqlx::PgPool;

use odeon_core::types::DbId;

use crate::models::category::Category;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, created_at";

/// Provides idempotent name resolution and song linking for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Look up a category by name, creating it on first sight.
    ///
    /// `ON CONFLICT ... DO UPDATE SET name = EXCLUDED.name` makes the
    /// statement return the row in both the insert and the conflict case,
    /// so two racing workflows both get the same id.
    pub async fn resolve_or_create(pool: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Resolve a list of names to category rows, creating missing ones.
    /// Duplicate names in the input resolve to the same row.
    pub async fn resolve_or_create_all(
        pool: &PgPool,
        names: &[String],
    ) -> Result<Vec<Category>, sqlx::Error> {
        let mut categories = Vec::with_capacity(names.len());
        for name in names {
            categories.push(Self::resolve_or_create(pool, name).await?);
        }
        Ok(categories)
    }

    /// Link a category to a song. Idempotent: re-linking an existing pair
    /// is a no-op (re-driven orchestrations must not duplicate links).
    pub async fn link_song(
        pool: &PgPool,
        song_id: DbId,
        category_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO song_categories (song_id, category_id) VALUES ($1, $2) \
             ON CONFLICT (song_id, category_id) DO NOTHING",
        )
        .bind(song_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List the categories linked to a song, alphabetically.
    pub async fn list_for_song(pool: &PgPool, song_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = "SELECT c.id, c.name, c.created_at FROM categories c \
             JOIN song_categories sc ON sc.category_id = c.id \
             WHERE sc.song_id = $1 \
             ORDER BY c.name";
        sqlx::query_as::<_, Category>(query)
            .bind(song_id)
            .fetch_all(pool)
            .await
    }

    /// Count link rows pointing at a category.
    pub async fn link_count(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM song_categories WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
    }
}
