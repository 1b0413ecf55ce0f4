//! Repository for the `users` table.
//!
//! Account rows belong to the identity provider; the only mutation this
//! service performs is the conditional credit debit.

use sqlx::PgPool;

use odeon_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, credits, created_at, updated_at";

/// Default credit balance for newly seeded users.
const DEFAULT_CREDITS: i32 = 100;

/// Provides read access to users plus the credit debit path.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user (seeding and tests), returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, credits) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.credits.unwrap_or(DEFAULT_CREDITS))
            .fetch_one(pool)
            .await
    }

    /// Read a user's current credit balance.
    pub async fn credits_of(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT credits FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Debit exactly `amount` credits, guarded so the balance never goes
    /// negative. Returns `false` if the user does not exist or the balance
    /// is below `amount` — in which case nothing is charged.
    pub async fn debit_credits(
        pool: &PgPool,
        id: DbId,
        amount: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET credits = credits - $2, updated_at = NOW() \
             WHERE id = $1 AND credits >= $2",
        )
        .bind(id)
        .bind(amount)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
