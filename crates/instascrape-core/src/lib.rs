use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod profiles;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use profiles::{load_profiles, CuratedProfile, ProfilesFile};

/// Canonical profile record produced by the extraction pipeline.
///
/// Numeric fields are unsigned: absent data maps to 0, never to null or a
/// negative value. `fetched_at` is `Some` only when the pipeline completed
/// successfully: live hits carry the extraction time, fallback hits carry
/// the curated entry's `last_updated` timestamp verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Lowercase-normalized public handle. Never empty in a returned record.
    pub identifier: String,
    pub display_name: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub posts_count: u64,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub is_private: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("profiles file validation failed: {0}")]
    Validation(String),
}
