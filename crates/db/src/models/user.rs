//! User entity model and DTOs.
//!
//! User accounts belong to the external identity provider; this service
//! reads them and mutates exactly one field — `credits` — through the
//! orchestrator's debit path.

use odeon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub credits: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user (seeding and tests; production rows are
/// written by the identity provider).
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub credits: Option<i32>,
}
