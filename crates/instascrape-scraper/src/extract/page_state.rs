//! Strategy 2: embedded page-state JSON on the profile page.
//!
//! Fetches the profile page as a document and pulls the user object out of
//! the `window._sharedData` assignment, falling back to targeted field
//! patterns when the assignment is absent but `ProfilePage` script content
//! remains.

use async_trait::async_trait;

use crate::client::ProfileClient;
use crate::extract::{outcome_from_error, ExtractStrategy};
use crate::normalize::normalize;
use crate::parse::{extract_page_state, recover_posts_count};
use crate::types::StrategyOutcome;

pub struct PageStateStrategy;

#[async_trait]
impl ExtractStrategy for PageStateStrategy {
    fn name(&self) -> &'static str {
        "page_state"
    }

    async fn attempt(&self, client: &ProfileClient, username: &str) -> StrategyOutcome {
        let html = match client.fetch_html(&format!("/{username}/")).await {
            Ok(html) => html,
            Err(err) => {
                tracing::debug!(username, error = %err, "profile page fetch failed");
                return outcome_from_error(err);
            }
        };

        let Some(raw) = extract_page_state(&html) else {
            tracing::debug!(username, "no page-state data in profile page");
            return StrategyOutcome::Empty;
        };

        let mut record = normalize(username, &raw);
        record.posts_count = recover_posts_count(&html, record.followers, record.posts_count);
        tracing::debug!(
            username,
            source = raw.source,
            followers = record.followers,
            "page-state data extracted"
        );
        StrategyOutcome::Success(record)
    }
}
