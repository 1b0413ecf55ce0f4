use std::sync::Arc;

use odeon_cloud::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything non-`Clone` sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: odeon_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object-storage provider for presigned playback URLs.
    pub storage: Arc<dyn ObjectStorage>,
}
