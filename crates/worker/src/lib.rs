//! Generation worker: the durable, resumable workflow that drives a song
//! request from `queued` to a terminal outcome.
//!
//! The [`dispatcher`] claims queued songs (one in flight per owner), the
//! [`orchestrator`] runs the per-song state machine with its side effects
//! journaled through [`steps`], and the [`watchdog`] sweeps up requests a
//! crashed or hung attempt left behind.

pub mod config;
pub mod dispatcher;
pub mod orchestrator;
pub mod steps;
pub mod watchdog;
