use thiserror::Error;

/// Internal faults produced while a single strategy runs.
///
/// None of these cross the pipeline boundary: the chain driver absorbs
/// every variant, logs it, and moves to the next strategy.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("profile endpoint returned 404 for {url}")]
    ProfileUnavailable { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// The only errors the pipeline surfaces to callers.
///
/// Everything transient (network faults, parse failures, upstream rate
/// limiting) is recovered internally; callers see either a usable record
/// or one of these two outcomes.
#[derive(Debug, Error)]
pub enum ScrapeOutcomeError {
    #[error("profile '{username}' could not be found or is inaccessible")]
    NotFound { username: String },

    #[error("invalid username '{username}': {reason}")]
    InvalidUsername { username: String, reason: String },
}
