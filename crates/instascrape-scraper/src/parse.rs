//! Response parser: locates and decodes the known embedded-data shapes in a
//! raw response body.
//!
//! ## Recognized shapes, most to least structured
//!
//! 1. Direct JSON body with the user object nested at a known path
//!    (`graphql.user`, `data.user`, or top-level `user`).
//! 2. A `window._sharedData = {…};` assignment inside a script block,
//!    extracted via balanced-brace scanning then decoded as JSON. A decode
//!    failure means "shape not present", never a hard error.
//! 3. `<script type="application/ld+json">` blocks whose `mainEntity`
//!    carries an `additionalProperty` name/value list.
//! 4. Open-Graph / description meta tags with counts embedded in free text
//!    (`"1,234 Followers"`, `"2.5M Followers"`).
//!
//! Every extractor returns `Option<RawProfile>` and never panics or errors
//! past its boundary; a malformed fragment must not abort a strategy.

use regex::Regex;

use crate::parse_helpers::{
    all_labeled_count_tokens, extract_balanced_object, labeled_count_token, meta_content,
};
use crate::types::RawProfile;

/// Parse a human-readable count string into an integer.
///
/// Strips commas and spaces, lowercases, then applies a `k`/`m`/`b` suffix
/// multiplier (1e3/1e6/1e9) to the numeric prefix, rounding to the nearest
/// integer. Pure and total: any input that does not parse yields 0.
#[must_use]
pub fn parse_count(text: &str) -> u64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        return 0;
    }

    let (number_part, multiplier) = match cleaned.as_bytes()[cleaned.len() - 1] {
        b'k' => (&cleaned[..cleaned.len() - 1], 1e3),
        b'm' => (&cleaned[..cleaned.len() - 1], 1e6),
        b'b' => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    match number_part.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rounded = (value * multiplier).round() as u64;
            rounded
        }
        _ => 0,
    }
}

/// Coerce a heterogeneous JSON value into a count.
///
/// Numbers pass through; strings funnel through [`parse_count`] (the target
/// sometimes serializes counts as `"1.2M"`); anything else is 0.
#[must_use]
pub fn count_from_value(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => parse_count(s),
        _ => 0,
    }
}

/// Coerce a heterogeneous JSON value into a boolean flag.
///
/// Accepts native booleans, `"true"`/`"false"` strings (case-insensitive),
/// and 0/1 numbers. Absent or unrecognized values are `false`.
#[must_use]
pub fn bool_from_value(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(serde_json::Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Shape 1: direct JSON body with the user object at a known path.
#[must_use]
pub fn extract_api_user(body: &serde_json::Value) -> Option<RawProfile> {
    let user = body
        .pointer("/graphql/user")
        .or_else(|| body.pointer("/data/user"))
        .or_else(|| body.get("user"))?;
    RawProfile::from_object("api_json", user).filter(|raw| !raw.is_empty())
}

/// Shape 2: embedded page-state JSON assignment in a script block.
///
/// Primary form is `window._sharedData = {…};` with the user object at
/// `entry_data.ProfilePage[0].graphql.user`. When that path is absent but
/// the page still carries `ProfilePage` script content, individual fields
/// are recovered with targeted patterns instead.
#[must_use]
pub fn extract_page_state(html: &str) -> Option<RawProfile> {
    if let Some(raw) = extract_shared_data(html) {
        return Some(raw);
    }
    if html.contains("ProfilePage") {
        return extract_profile_script_fields(html);
    }
    None
}

fn extract_shared_data(html: &str) -> Option<RawProfile> {
    let assign_re = Regex::new(r"window\._sharedData\s*=\s*").expect("valid regex");
    let m = assign_re.find(html)?;
    let json_text = extract_balanced_object(&html[m.end()..])?;

    // Decode failure is "shape not present", not an error.
    let data: serde_json::Value = serde_json::from_str(json_text).ok()?;
    let user = data.pointer("/entry_data/ProfilePage/0/graphql/user")?;
    RawProfile::from_object("page_state", user).filter(|raw| !raw.is_empty())
}

/// Recover individual fields from `ProfilePage` script content via text
/// patterns when no decodable shared-data object exists.
fn extract_profile_script_fields(html: &str) -> Option<RawProfile> {
    let mut raw = RawProfile::new("page_state");

    let numeric_fields = [
        ("follower_count", "followers_count"),
        ("following_count", "following_count"),
        ("media_count", "media_count"),
    ];
    for (key, alias) in numeric_fields {
        for candidate in [key, alias] {
            let re = Regex::new(&format!(r#""{candidate}"\s*:\s*(\d+)"#)).expect("valid regex");
            if let Some(cap) = re.captures(html) {
                if let Ok(n) = cap[1].parse::<u64>() {
                    raw.insert(key, serde_json::Value::from(n));
                    break;
                }
            }
        }
    }

    for key in ["full_name", "biography"] {
        let re = Regex::new(&format!(r#""{key}"\s*:\s*"([^"]*)""#)).expect("valid regex");
        if let Some(cap) = re.captures(html) {
            raw.insert(key, serde_json::Value::from(cap[1].to_string()));
        }
    }

    for key in ["is_verified", "is_private"] {
        let re = Regex::new(&format!(r#""{key}"\s*:\s*(true|false)"#)).expect("valid regex");
        if let Some(cap) = re.captures(html) {
            raw.insert(key, serde_json::Value::from(&cap[1] == "true"));
        }
    }

    // A bag without a follower count is unusable; report the shape as absent.
    raw.get("follower_count")?;
    Some(raw)
}

/// Shape 3: linked-data (schema.org-style) script block with a nested
/// `additionalProperty` name/value list.
#[must_use]
pub fn extract_linked_data(html: &str) -> Option<RawProfile> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    for cap in script_re.captures_iter(html) {
        let Some(json_text) = cap.get(1) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(json_text.as_str()) else {
            continue;
        };

        // The profile entity may sit at the top level or under `mainEntity`.
        let entity = value.get("mainEntity").unwrap_or(&value);
        let Some(props) = entity.get("additionalProperty").and_then(|v| v.as_array()) else {
            continue;
        };

        let mut raw = RawProfile::new("linked_data");
        for prop in props {
            let (Some(name), Some(prop_value)) =
                (prop.get("name").and_then(|v| v.as_str()), prop.get("value"))
            else {
                continue;
            };
            raw.insert(name, prop_value.clone());
        }

        for key in ["name", "alternateName", "description", "image"] {
            if let Some(v) = entity.get(key) {
                raw.insert(key, v.clone());
            }
        }

        // Verification sometimes only appears as an interaction hint in the
        // surrounding document, not as a structured property.
        if raw.get("is_verified").is_none() && json_text.as_str().contains("verified") {
            raw.insert("is_verified", serde_json::Value::from(true));
        }

        if raw.get("followers").is_some() {
            return Some(raw);
        }
    }
    None
}

/// Shape 4: Open-Graph / description meta tags with counts in free text.
///
/// Only produces a bag when a follower count is actually present in the
/// description, since a bare title is not usable data.
#[must_use]
pub fn extract_meta_tags(html: &str) -> Option<RawProfile> {
    let description = meta_content(html, "og:description")
        .or_else(|| meta_content(html, "description"))?;

    let followers_token = labeled_count_token(&description, "followers")?;

    let mut raw = RawProfile::new("meta_tags");
    raw.insert("followers", serde_json::Value::from(followers_token));
    if let Some(token) = labeled_count_token(&description, "following") {
        raw.insert("following", serde_json::Value::from(token));
    }
    if let Some(token) = labeled_count_token(&description, "posts") {
        raw.insert("posts", serde_json::Value::from(token));
    }

    if let Some(title) = meta_content(html, "og:title") {
        // "Leo Messi (@leomessi) • ..."; the display name precedes the handle.
        let name = title.split(" (@").next().unwrap_or(&title).trim();
        if !name.is_empty() {
            raw.insert("name", serde_json::Value::from(name));
        }
    }
    if let Some(image) = meta_content(html, "og:image") {
        raw.insert("image", serde_json::Value::from(image));
    }
    raw.insert("description", serde_json::Value::from(description));

    Some(raw)
}

/// Follower count below which a sub-1000 post count is considered plausible.
const RECOVERY_FOLLOWER_FLOOR: u64 = 10_000_000;

/// Secondary in-page recovery for implausibly small post counts.
///
/// Large accounts frequently surface a truncated post count in the primary
/// shape while the real figure still appears elsewhere in the page body.
/// When `0 < posts < 1000` but the account shows at least
/// [`RECOVERY_FOLLOWER_FLOOR`] followers, rescan the body for
/// `<number>[kmb]? posts` patterns and take the largest value exceeding the
/// parsed one. Never fabricates: if no better match exists, the original
/// value is kept.
#[must_use]
pub fn recover_posts_count(html: &str, followers: u64, posts: u64) -> u64 {
    if posts == 0 || posts >= 1000 || followers < RECOVERY_FOLLOWER_FLOOR {
        return posts;
    }

    let mut candidates = all_labeled_count_tokens(html, "posts");
    candidates.extend(all_labeled_count_tokens(html, "post"));

    candidates
        .iter()
        .map(|token| parse_count(token))
        .filter(|&candidate| candidate > posts)
        .max()
        .unwrap_or(posts)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
