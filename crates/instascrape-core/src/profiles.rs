use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ProfileRecord};

/// One curated last-known-good profile entry from `profiles.yaml`.
///
/// These are static fallback records consulted only when every live
/// extraction strategy fails. `last_updated` is the curation timestamp,
/// not a fetch time, and consumers must treat it as approximate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedProfile {
    pub identifier: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub posts_count: u64,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_private: bool,
    pub last_updated: DateTime<Utc>,
}

impl CuratedProfile {
    /// Convert to a [`ProfileRecord`], carrying the curated timestamp as
    /// `fetched_at` so repeated fallback lookups return identical records.
    #[must_use]
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
            followers: self.followers,
            following: self.following,
            posts_count: self.posts_count,
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            is_verified: self.is_verified,
            is_private: self.is_private,
            fetched_at: Some(self.last_updated),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<CuratedProfile>,
}

/// Load and validate the curated profiles file from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profiles_file: ProfilesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProfilesFileParse)?;

    validate_profiles(&profiles_file)?;

    Ok(profiles_file)
}

fn validate_profiles(profiles_file: &ProfilesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for profile in &profiles_file.profiles {
        let id = profile.identifier.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "profile identifier must be non-empty".to_string(),
            ));
        }

        if id != profile.identifier || id.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "profile identifier '{}' must be lowercase with no surrounding whitespace",
                profile.identifier
            )));
        }

        if !seen.insert(id.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile identifier: '{id}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<(), ConfigError> {
        let file: ProfilesFile = serde_yaml::from_str(yaml).expect("valid yaml");
        validate_profiles(&file)
    }

    #[test]
    fn accepts_minimal_entry() {
        let yaml = r"
profiles:
  - identifier: cristiano
    display_name: Cristiano Ronaldo
    followers: 664800000
    is_verified: true
    last_updated: 2024-12-30T14:03:00Z
";
        assert!(parse(yaml).is_ok());
    }

    #[test]
    fn defaults_counts_to_zero() {
        let yaml = r"
profiles:
  - identifier: nasa
    last_updated: 2024-12-30T14:03:00Z
";
        let file: ProfilesFile = serde_yaml::from_str(yaml).unwrap();
        let profile = &file.profiles[0];
        assert_eq!(profile.followers, 0);
        assert_eq!(profile.following, 0);
        assert_eq!(profile.posts_count, 0);
        assert!(!profile.is_verified);
        assert!(!profile.is_private);
    }

    #[test]
    fn rejects_empty_identifier() {
        let yaml = r#"
profiles:
  - identifier: ""
    last_updated: 2024-12-30T14:03:00Z
"#;
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("non-empty")));
    }

    #[test]
    fn rejects_uppercase_identifier() {
        let yaml = r"
profiles:
  - identifier: LeoMessi
    last_updated: 2024-12-30T14:03:00Z
";
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("lowercase")));
    }

    #[test]
    fn rejects_duplicate_identifier() {
        let yaml = r"
profiles:
  - identifier: nasa
    last_updated: 2024-12-30T14:03:00Z
  - identifier: nasa
    last_updated: 2024-12-30T14:03:00Z
";
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
    }

    #[test]
    fn to_record_carries_curated_timestamp() {
        let yaml = r"
profiles:
  - identifier: natgeo
    display_name: National Geographic
    followers: 240000000
    is_verified: true
    last_updated: 2024-12-30T14:03:00Z
";
        let file: ProfilesFile = serde_yaml::from_str(yaml).unwrap();
        let record = file.profiles[0].to_record();
        assert_eq!(record.identifier, "natgeo");
        assert_eq!(record.followers, 240_000_000);
        assert_eq!(
            record.fetched_at,
            Some("2024-12-30T14:03:00Z".parse().unwrap()),
            "fallback records carry the curated timestamp, not a fetch time"
        );
    }
}
