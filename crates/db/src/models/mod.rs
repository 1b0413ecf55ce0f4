//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the operations that create or mutate rows

pub mod category;
pub mod session;
pub mod song;
pub mod status;
pub mod user;
pub mod workflow_step;
