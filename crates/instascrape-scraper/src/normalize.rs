//! Normalizer: collapses heterogeneous raw field bags into the canonical
//! record shape.
//!
//! Every extraction shape names the same facts differently (`follower_count`
//! vs `edge_followed_by.count` vs a bare `followers` string). Each canonical
//! field has an ordered alias chain; the first alias present in the bag wins
//! and the rest are ignored. Missing numerics become 0, missing strings
//! become `None`, missing flags become `false`; normalization is total and
//! never fails.

use chrono::Utc;
use instascrape_core::ProfileRecord;

use crate::parse::{bool_from_value, count_from_value};
use crate::types::RawProfile;

/// Aliases that carry the count directly or nested as `{"count": n}`.
const FOLLOWERS_ALIASES: &[&str] = &[
    "edge_followed_by",
    "follower_count",
    "followers_count",
    "followers",
];
const FOLLOWING_ALIASES: &[&str] = &["edge_follow", "following_count", "following"];
const POSTS_ALIASES: &[&str] = &[
    "edge_owner_to_timeline_media",
    "media_count",
    "posts_count",
    "posts",
];
const NAME_ALIASES: &[&str] = &["full_name", "profile_name", "name"];
const BIO_ALIASES: &[&str] = &["biography", "bio", "description"];
const AVATAR_ALIASES: &[&str] = &["profile_pic_url_hd", "profile_pic_url", "image"];

/// Build a canonical record from a raw field bag.
///
/// `identifier` always comes from the request, never from the response, so a
/// misdirected page cannot relabel the record. `fetched_at` is stamped with
/// the current time because a bag only exists after a live fetch succeeded.
#[must_use]
pub fn normalize(identifier: &str, raw: &RawProfile) -> ProfileRecord {
    ProfileRecord {
        identifier: identifier.to_string(),
        display_name: first_string(raw, NAME_ALIASES),
        followers: first_count(raw, FOLLOWERS_ALIASES),
        following: first_count(raw, FOLLOWING_ALIASES),
        posts_count: first_count(raw, POSTS_ALIASES),
        bio: first_string(raw, BIO_ALIASES),
        avatar_url: first_string(raw, AVATAR_ALIASES),
        is_verified: bool_from_value(raw.get("is_verified")),
        is_private: bool_from_value(raw.get("is_private")),
        fetched_at: Some(Utc::now()),
    }
}

/// First alias present in the bag, read as a count.
///
/// Graph-edge objects (`{"count": n, …}`) contribute their nested `count`;
/// plain numbers and formatted strings funnel through the count parser. An
/// alias that is present but unusable still wins the chain: presence, not
/// parse success, decides precedence.
fn first_count(raw: &RawProfile, aliases: &[&str]) -> u64 {
    for alias in aliases {
        if let Some(value) = raw.get(alias) {
            if let Some(nested) = value.get("count") {
                return count_from_value(nested);
            }
            return count_from_value(value);
        }
    }
    0
}

/// First alias present in the bag as a non-empty string.
fn first_string(raw: &RawProfile, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(value) = raw.get(alias) {
            if let Some(s) = value.as_str() {
                let trimmed = s.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(fields: serde_json::Value) -> RawProfile {
        RawProfile::from_object("api_json", &fields).expect("object literal")
    }

    #[test]
    fn graph_edge_counts_take_precedence() {
        let raw = bag(json!({
            "edge_followed_by": {"count": 520_000_000_u64},
            "follower_count": 1,
            "edge_follow": {"count": 289},
            "edge_owner_to_timeline_media": {"count": 1024},
        }));
        let record = normalize("leomessi", &raw);
        assert_eq!(record.followers, 520_000_000);
        assert_eq!(record.following, 289);
        assert_eq!(record.posts_count, 1024);
    }

    #[test]
    fn flat_and_string_counts_are_coerced() {
        let raw = bag(json!({
            "followers": "2.5M",
            "following": "1,200",
            "posts_count": 77,
        }));
        let record = normalize("someone", &raw);
        assert_eq!(record.followers, 2_500_000);
        assert_eq!(record.following, 1200);
        assert_eq!(record.posts_count, 77);
    }

    #[test]
    fn identifier_comes_from_request_not_response() {
        let raw = bag(json!({"username": "impostor", "full_name": "Real Name"}));
        let record = normalize("requested", &raw);
        assert_eq!(record.identifier, "requested");
        assert_eq!(record.display_name.as_deref(), Some("Real Name"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let record = normalize("ghost", &RawProfile::new("meta_tags"));
        assert_eq!(record.followers, 0);
        assert_eq!(record.following, 0);
        assert_eq!(record.posts_count, 0);
        assert_eq!(record.display_name, None);
        assert_eq!(record.bio, None);
        assert_eq!(record.avatar_url, None);
        assert!(!record.is_verified);
        assert!(!record.is_private);
        assert!(record.fetched_at.is_some());
    }

    #[test]
    fn string_aliases_follow_the_chain() {
        let raw = bag(json!({
            "bio": "fallback bio",
            "biography": "primary bio",
            "image": "https://cdn.example/low.jpg",
            "profile_pic_url_hd": "https://cdn.example/hd.jpg",
        }));
        let record = normalize("x", &raw);
        assert_eq!(record.bio.as_deref(), Some("primary bio"));
        assert_eq!(
            record.avatar_url.as_deref(),
            Some("https://cdn.example/hd.jpg")
        );
    }

    #[test]
    fn blank_strings_defer_to_later_aliases() {
        let raw = bag(json!({"full_name": "  ", "name": "From Meta"}));
        let record = normalize("x", &raw);
        assert_eq!(record.display_name.as_deref(), Some("From Meta"));
    }

    #[test]
    fn boolean_flags_accept_string_forms() {
        let raw = bag(json!({"is_verified": "true", "is_private": 0}));
        let record = normalize("x", &raw);
        assert!(record.is_verified);
        assert!(!record.is_private);
    }
}
