//! Extraction strategy chain.
//!
//! Tries strategies in priority order (authenticated-style JSON endpoints,
//! embedded page-state JSON, linked-data script blocks, meta tags) and
//! returns the first usable result. Each strategy is an independent unit
//! behind [`ExtractStrategy`] so the chain order is data, not control flow,
//! and tests can splice in fakes.

mod api;
mod linked_data;
mod meta_tags;
mod page_state;

pub use api::ProfileApiStrategy;
pub use linked_data::LinkedDataStrategy;
pub use meta_tags::MetaTagStrategy;
pub use page_state::PageStateStrategy;

use async_trait::async_trait;

use crate::client::ProfileClient;
use crate::error::ScraperError;
use crate::types::StrategyOutcome;

/// One extraction approach against the live target.
///
/// Implementations never propagate errors past this boundary: anything
/// that goes wrong inside an attempt becomes a [`StrategyOutcome`] variant
/// for the chain driver to log and skip.
#[async_trait]
pub trait ExtractStrategy: Send + Sync {
    /// Short stable name for logs and diagnostics.
    fn name(&self) -> &'static str;

    async fn attempt(&self, client: &ProfileClient, username: &str) -> StrategyOutcome;
}

/// The production chain, in priority order.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ExtractStrategy>> {
    vec![
        Box::new(ProfileApiStrategy),
        Box::new(PageStateStrategy),
        Box::new(LinkedDataStrategy),
        Box::new(MetaTagStrategy),
    ]
}

/// Shared fault mapping: an upstream refusal is `Blocked` so the driver
/// backs off; everything else is carried as `Error`.
fn outcome_from_error(err: ScraperError) -> StrategyOutcome {
    match err {
        ScraperError::RateLimited { .. } => StrategyOutcome::Blocked,
        other => StrategyOutcome::Error(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chain_order() {
        let names: Vec<&str> = default_strategies().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["profile_api", "page_state", "linked_data", "meta_tags"]
        );
    }

    #[test]
    fn rate_limit_maps_to_blocked() {
        let outcome = outcome_from_error(ScraperError::RateLimited {
            domain: "example.com".to_string(),
            retry_after_secs: 30,
        });
        assert!(matches!(outcome, StrategyOutcome::Blocked));
    }

    #[test]
    fn other_faults_map_to_error() {
        let outcome = outcome_from_error(ScraperError::ProfileUnavailable {
            url: "http://example.com/x/".to_string(),
        });
        assert!(matches!(outcome, StrategyOutcome::Error(_)));
    }
}
