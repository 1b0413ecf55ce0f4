//! Object-storage access.
//!
//! This service never writes blobs — the inference service does, out of
//! band, and returns keys. The only operation needed here is exchanging a
//! stored key for a short-lived presigned GET URL.

pub mod s3;

use std::time::Duration;

use async_trait::async_trait;

/// Errors from the storage provider.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Presigning failed: {0}")]
    Presign(String),

    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

/// Read-side object storage: presigned, time-limited GET access.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Produce a presigned GET URL for `key`, valid for `ttl`.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
