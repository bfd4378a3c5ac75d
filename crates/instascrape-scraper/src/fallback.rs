//! Curated fallback store, consulted only after every live strategy fails.
//!
//! Holds the validated entries from `profiles.yaml` and resolves lookups
//! in three tiers of decreasing strictness:
//!
//! 1. exact identifier match;
//! 2. separator-insensitive match (`.`, `_`, `-`, and spaces stripped from
//!    both sides, so `virat.kohli` and `viratkohli` resolve to the same
//!    entry);
//! 3. substring match in either direction, for partial handles.
//!
//! Lookups never fabricate: an identifier with no curated entry gets
//! `None`, and a hit is returned with its curated timestamp intact so
//! repeated lookups yield identical records.

use instascrape_core::{CuratedProfile, ProfileRecord, ProfilesFile};

pub struct FallbackStore {
    profiles: Vec<CuratedProfile>,
}

impl FallbackStore {
    #[must_use]
    pub fn new(file: ProfilesFile) -> Self {
        Self {
            profiles: file.profiles,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Resolve an identifier to a curated record, trying each tier in order.
    #[must_use]
    pub fn lookup(&self, identifier: &str) -> Option<ProfileRecord> {
        let needle = identifier.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(profile) = self.profiles.iter().find(|p| p.identifier == needle) {
            tracing::debug!(identifier = %needle, "fallback hit (exact)");
            return Some(profile.to_record());
        }

        let stripped_needle = strip_separators(&needle);
        if !stripped_needle.is_empty() {
            if let Some(profile) = self
                .profiles
                .iter()
                .find(|p| strip_separators(&p.identifier) == stripped_needle)
            {
                tracing::debug!(identifier = %needle, matched = %profile.identifier, "fallback hit (separator-insensitive)");
                return Some(profile.to_record());
            }
        }

        // Partial handles resolve too, but only when the overlap is
        // substantial enough not to alias short needles onto everything.
        if needle.len() >= 4 {
            if let Some(profile) = self.profiles.iter().find(|p| {
                p.identifier.contains(needle.as_str()) || needle.contains(p.identifier.as_str())
            }) {
                tracing::debug!(identifier = %needle, matched = %profile.identifier, "fallback hit (substring)");
                return Some(profile.to_record());
            }
        }

        None
    }
}

fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '.' | '_' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use instascrape_core::ProfilesFile;

    fn store() -> FallbackStore {
        let yaml = r"
profiles:
  - identifier: cristiano
    display_name: Cristiano Ronaldo
    followers: 664800000
    is_verified: true
    last_updated: 2024-12-30T14:03:00Z
  - identifier: virat.kohli
    display_name: Virat Kohli
    followers: 273000000
    is_verified: true
    last_updated: 2024-12-30T14:03:00Z
  - identifier: leomessi
    display_name: Leo Messi
    followers: 520000000
    is_verified: true
    last_updated: 2024-12-30T14:03:00Z
";
        let file: ProfilesFile = serde_yaml::from_str(yaml).expect("valid yaml");
        FallbackStore::new(file)
    }

    #[test]
    fn exact_match_wins() {
        let record = store().lookup("cristiano").expect("curated entry");
        assert_eq!(record.identifier, "cristiano");
        assert_eq!(record.followers, 664_800_000);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let record = store().lookup("  Cristiano ").expect("curated entry");
        assert_eq!(record.identifier, "cristiano");
    }

    #[test]
    fn separator_insensitive_match() {
        let record = store().lookup("viratkohli").expect("curated entry");
        assert_eq!(record.identifier, "virat.kohli");

        let record = store().lookup("virat_kohli").expect("curated entry");
        assert_eq!(record.identifier, "virat.kohli");

        let record = store().lookup("leo.messi").expect("curated entry");
        assert_eq!(record.identifier, "leomessi");
    }

    #[test]
    fn substring_match_in_either_direction() {
        let record = store().lookup("messi").expect("curated entry");
        assert_eq!(record.identifier, "leomessi");

        let record = store().lookup("leomessi10").expect("curated entry");
        assert_eq!(record.identifier, "leomessi");
    }

    #[test]
    fn short_needles_do_not_substring_match() {
        assert!(store().lookup("a").is_none());
        assert!(store().lookup("me").is_none());
    }

    #[test]
    fn unknown_identifier_is_none() {
        assert!(store().lookup("definitely_not_curated_xyz").is_none());
        assert!(store().lookup("").is_none());
    }

    #[test]
    fn repeated_lookups_are_identical() {
        let s = store();
        let a = s.lookup("cristiano").expect("curated entry");
        let b = s.lookup("cristiano").expect("curated entry");
        assert_eq!(a, b, "fallback records must be stable across lookups");
    }
}
