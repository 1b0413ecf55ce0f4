use crate::types::DbId;

/// Domain error taxonomy shared across the workspace.
///
/// Orchestration failures (`Configuration`, `InsufficientCredits`,
/// `InferenceFailed`) settle a song into a terminal status rather than
/// propagating to an end user; the playback variants (`NotFound`,
/// `Forbidden`, `NotReady`, `StorageKeyMissing`) surface as distinct
/// HTTP error codes so the client can render the right message.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// None of the three generation input shapes could be resolved.
    /// Fatal and unretryable; detected at enqueue time where possible.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The owner's credit balance cannot cover the request.
    #[error("Insufficient credits: {available} available, {required} required")]
    InsufficientCredits { required: i32, available: i32 },

    /// The remote inference call failed (network error, non-2xx, or
    /// malformed response body).
    #[error("Inference call failed: {0}")]
    InferenceFailed(String),

    /// Playback requested before generation completed.
    #[error("{entity} with id {id} is not ready for playback")]
    NotReady { entity: &'static str, id: DbId },

    /// A processed song with no storage key. Indicates a bug or a race;
    /// kept distinct from `NotReady` so it stays diagnosable.
    #[error("Song {id} is processed but has no storage key")]
    StorageKeyMissing { id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
