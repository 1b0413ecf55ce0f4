//! HTTP API for the music-generation service.
//!
//! Exposes song submission, listing, status polling, publishing, and the
//! playback gate that exchanges a song for a short-lived streaming URL.
//! Generation itself happens out of process in the worker; every handler
//! here only reads and writes rows.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
