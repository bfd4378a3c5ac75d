//! Strategy 3: linked-data script blocks on the profile page.
//!
//! Survives markup reshuffles that break the page-state shape, since the
//! `application/ld+json` block is maintained for search engines and tends
//! to outlive internal payload formats.

use async_trait::async_trait;

use crate::client::ProfileClient;
use crate::extract::{outcome_from_error, ExtractStrategy};
use crate::normalize::normalize;
use crate::parse::extract_linked_data;
use crate::types::StrategyOutcome;

pub struct LinkedDataStrategy;

#[async_trait]
impl ExtractStrategy for LinkedDataStrategy {
    fn name(&self) -> &'static str {
        "linked_data"
    }

    async fn attempt(&self, client: &ProfileClient, username: &str) -> StrategyOutcome {
        let html = match client.fetch_html(&format!("/{username}/")).await {
            Ok(html) => html,
            Err(err) => {
                tracing::debug!(username, error = %err, "profile page fetch failed");
                return outcome_from_error(err);
            }
        };

        match extract_linked_data(&html) {
            Some(raw) => {
                let record = normalize(username, &raw);
                tracing::debug!(username, followers = record.followers, "linked data extracted");
                StrategyOutcome::Success(record)
            }
            None => {
                tracing::debug!(username, "no linked-data block in profile page");
                StrategyOutcome::Empty
            }
        }
    }
}
