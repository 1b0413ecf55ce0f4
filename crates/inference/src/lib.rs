//! Client for the remote music-generation service.
//!
//! The service exposes three logically distinct HTTP endpoints, one per
//! generation input shape. Each accepts a JSON body of generation
//! parameters plus the mode-specific text fields and returns the storage
//! keys of the rendered audio/cover plus free-text category labels.
//!
//! [`InferenceBackend`] is the seam the orchestrator depends on; the
//! production implementation is [`client::InferenceClient`], tests
//! substitute in-process fakes.

pub mod client;
pub mod types;

use async_trait::async_trait;

use odeon_core::generation::{GenerationInput, GenerationParams};

use crate::types::GenerationOutput;

/// Errors from one generation attempt. All variants mean the attempt
/// failed; the orchestrator settles the song as `failed` and never retries
/// on its own.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// Network-level failure or timeout before a response arrived.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("Inference endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}

/// The remote generation procedure, abstracted for testability.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Perform exactly one generation call for the given input shape.
    async fn generate(
        &self,
        input: &GenerationInput,
        params: &GenerationParams,
    ) -> Result<GenerationOutput, InferenceError>;
}
