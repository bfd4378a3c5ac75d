use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the scraping pipeline.
///
/// Loaded from environment variables by [`crate::config::load_app_config`].
/// The delay bounds are milliseconds; `min` is always validated to be at
/// most `max` for both the single-profile and the batch inter-item range.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Path to the curated fallback profiles YAML file.
    pub profiles_path: PathBuf,
    /// Origin the live strategies fetch from. Overridden in tests to point
    /// at a local mock server.
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Randomized pre-request delay bounds for single-profile scrapes.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Randomized inter-item delay bounds for batch scrapes (wider than the
    /// single-profile range to keep batch traffic below detection thresholds).
    pub batch_min_delay_ms: u64,
    pub batch_max_delay_ms: u64,
    /// Fixed pause after an upstream rate-limit response before the chain
    /// moves on.
    pub block_backoff_secs: u64,
    /// Hard cap on identifiers per batch call; excess is dropped with a
    /// warning to bound worst-case latency.
    pub max_batch_size: usize,
}
