/// Worker configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Dispatcher polling interval in milliseconds (default: `1000`).
    pub poll_interval_ms: u64,
    /// Watchdog sweep interval in seconds (default: `60`).
    pub watchdog_interval_secs: u64,
    /// A song stuck in `processing` longer than this is force-failed
    /// (default: `1800`).
    pub processing_timeout_secs: i64,
    /// A `queued` song claimed longer than this ago without progress has
    /// its claim released for re-drive (default: `300`).
    pub claim_timeout_secs: i64,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `POLL_INTERVAL_MS`         | `1000`  |
    /// | `WATCHDOG_INTERVAL_SECS`   | `60`    |
    /// | `PROCESSING_TIMEOUT_SECS`  | `1800`  |
    /// | `CLAIM_TIMEOUT_SECS`       | `300`   |
    pub fn from_env() -> Self {
        fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> T {
            match std::env::var(var) {
                Ok(value) => value
                    .parse()
                    .unwrap_or_else(|_| panic!("{var} must be a valid number")),
                Err(_) => default,
            }
        }

        Self {
            poll_interval_ms: parse_env("POLL_INTERVAL_MS", 1000),
            watchdog_interval_secs: parse_env("WATCHDOG_INTERVAL_SECS", 60),
            processing_timeout_secs: parse_env("PROCESSING_TIMEOUT_SECS", 1800),
            claim_timeout_secs: parse_env("CLAIM_TIMEOUT_SECS", 300),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            watchdog_interval_secs: 60,
            processing_timeout_secs: 1800,
            claim_timeout_secs: 300,
        }
    }
}
