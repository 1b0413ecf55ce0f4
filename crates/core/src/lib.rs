//! Domain logic shared by every Odeon crate.
//!
//! Pure types and functions only — no database, no HTTP. The generation
//! workflow (`odeon-worker`) and the API surface (`odeon-api`) both build
//! on the taxonomy and input resolution defined here.

pub mod error;
pub mod generation;
pub mod types;
