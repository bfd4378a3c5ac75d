//! Domain types for the extraction pipeline.

use instascrape_core::ProfileRecord;

use crate::error::ScraperError;

/// Untyped field bag produced by the response parser.
///
/// Each strategy surfaces whatever key names its source shape uses
/// (`edge_followed_by`, `follower_count`, `followers`, ...); the normalizer
/// reconciles them. A `RawProfile` never crosses the pipeline boundary and
/// is discarded after normalization.
#[derive(Debug, Clone)]
pub struct RawProfile {
    pub fields: serde_json::Map<String, serde_json::Value>,
    /// Which parser shape produced this bag, for diagnostics.
    ///
    /// One of: `"api_json"`, `"page_state"`, `"linked_data"`, `"meta_tags"`.
    pub source: &'static str,
}

impl RawProfile {
    #[must_use]
    pub fn new(source: &'static str) -> Self {
        Self {
            fields: serde_json::Map::new(),
            source,
        }
    }

    /// Build from an existing JSON object, e.g. a `graphql.user` node.
    #[must_use]
    pub fn from_object(source: &'static str, object: &serde_json::Value) -> Option<Self> {
        object.as_object().map(|map| Self {
            fields: map.clone(),
            source,
        })
    }

    pub fn insert(&mut self, key: &str, value: serde_json::Value) {
        self.fields.insert(key.to_string(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Tagged result of one strategy attempt.
///
/// The chain driver treats `Empty`, `Blocked`, and `Error` identically
/// (log, continue to the next strategy); only `Success` with a non-zero
/// follower count short-circuits the chain.
#[derive(Debug)]
pub enum StrategyOutcome {
    Success(ProfileRecord),
    /// The strategy ran but produced no usable data.
    Empty,
    /// The target refused the request (rate limit / access denied).
    Blocked,
    Error(ScraperError),
}
