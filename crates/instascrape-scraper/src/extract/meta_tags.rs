//! Strategy 4: Open-Graph and description meta tags.
//!
//! The last live resort. Counts here are display-formatted (`"2.5M"`), so
//! precision is reduced, but the tags are served even on pages that demand
//! a login for everything else.

use async_trait::async_trait;

use crate::client::ProfileClient;
use crate::extract::{outcome_from_error, ExtractStrategy};
use crate::normalize::normalize;
use crate::parse::{extract_meta_tags, recover_posts_count};
use crate::types::StrategyOutcome;

pub struct MetaTagStrategy;

#[async_trait]
impl ExtractStrategy for MetaTagStrategy {
    fn name(&self) -> &'static str {
        "meta_tags"
    }

    async fn attempt(&self, client: &ProfileClient, username: &str) -> StrategyOutcome {
        let html = match client.fetch_html(&format!("/{username}/")).await {
            Ok(html) => html,
            Err(err) => {
                tracing::debug!(username, error = %err, "profile page fetch failed");
                return outcome_from_error(err);
            }
        };

        let Some(raw) = extract_meta_tags(&html) else {
            tracing::debug!(username, "no usable meta tags in profile page");
            return StrategyOutcome::Empty;
        };

        let mut record = normalize(username, &raw);
        record.posts_count = recover_posts_count(&html, record.followers, record.posts_count);
        tracing::debug!(
            username,
            followers = record.followers,
            "meta-tag counts extracted"
        );
        StrategyOutcome::Success(record)
    }
}
