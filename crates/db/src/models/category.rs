//! Category entity model.

use odeon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table.
///
/// Category names form a deduplicated set; a name is never inserted
/// twice (enforced by `uq_categories_name`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
