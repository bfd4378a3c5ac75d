//! Low-level text-scanning primitives shared by the response parser.
//!
//! This module is crate-private so [`crate::parse`] and the strategy
//! modules can share the same routines without exposing them publicly.

use regex::Regex;

/// Try to extract a balanced JSON object from the start of `s`.
///
/// Scans character-by-character tracking brace depth, respecting string
/// literals and escape sequences. Returns the shortest prefix of `s` that
/// forms a complete `{…}` object, or `None` if the object is unterminated.
/// Only `}` (not `]`) at depth 0 triggers a return, so malformed input like
/// `{42]` is never accepted.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract the content of a meta tag by `property` or `name` attribute.
///
/// Handles both attribute orders (`property` before `content` and the
/// reverse) since the target's markup is not consistent about it.
pub(crate) fn meta_content(html: &str, attr_value: &str) -> Option<String> {
    let escaped = regex::escape(attr_value);
    let patterns = [
        format!(
            r#"(?is)<meta[^>]+(?:property|name)\s*=\s*["']{escaped}["'][^>]*content\s*=\s*["']([^"']*)["']"#
        ),
        format!(
            r#"(?is)<meta[^>]+content\s*=\s*["']([^"']*)["'][^>]*(?:property|name)\s*=\s*["']{escaped}["']"#
        ),
    ];
    for pattern in &patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(html) {
            if let Some(m) = cap.get(1) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}

/// Find the first `<number>[kmb]? <label>` occurrence in free text and
/// return the raw number token (suffix included) for [`crate::parse::parse_count`].
///
/// Matches e.g. `"1,234 Followers"`, `"2.5M followers"`, `"982 posts"`.
pub(crate) fn labeled_count_token(text: &str, label: &str) -> Option<String> {
    let escaped = regex::escape(label);
    let re = Regex::new(&format!(
        r"(?i)([0-9][0-9,\.]*\s?[kmb]?)\s*{escaped}\b"
    ))
    .expect("valid regex");
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// All `<number>[km]? <label>` tokens in a page body, in document order.
/// Used by the plausibility-recovery pass, which wants every candidate.
pub(crate) fn all_labeled_count_tokens(text: &str, label: &str) -> Vec<String> {
    let escaped = regex::escape(label);
    let re = Regex::new(&format!(
        r"(?i)([0-9][0-9,\.]*\s?[kmb]?)\s*{escaped}\b"
    ))
    .expect("valid regex");
    re.captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
