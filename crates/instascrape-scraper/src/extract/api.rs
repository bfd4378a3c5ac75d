//! Strategy 1: the target's JSON profile endpoints.
//!
//! Tries the legacy web-profile query (`/{username}/?__a=1&__d=dis`) first,
//! then the current web-API route (`/api/v1/users/{username}/info/`). Both
//! return the full user object when they work, which makes this the
//! highest-fidelity source and the first in the chain.

use async_trait::async_trait;

use crate::client::ProfileClient;
use crate::extract::{outcome_from_error, ExtractStrategy};
use crate::normalize::normalize;
use crate::parse::extract_api_user;
use crate::types::StrategyOutcome;

pub struct ProfileApiStrategy;

#[async_trait]
impl ExtractStrategy for ProfileApiStrategy {
    fn name(&self) -> &'static str {
        "profile_api"
    }

    async fn attempt(&self, client: &ProfileClient, username: &str) -> StrategyOutcome {
        let paths = [
            format!("/{username}/?__a=1&__d=dis"),
            format!("/api/v1/users/{username}/info/"),
        ];

        for path in &paths {
            match client.fetch_json(path).await {
                Ok(body) => {
                    if let Some(raw) = extract_api_user(&body) {
                        tracing::debug!(username, path = %path, source = raw.source, "api user object found");
                        return StrategyOutcome::Success(normalize(username, &raw));
                    }
                    tracing::debug!(username, path = %path, "api response carried no user object");
                }
                Err(err) => {
                    tracing::debug!(username, path = %path, error = %err, "api endpoint failed");
                    if matches!(err, crate::error::ScraperError::RateLimited { .. }) {
                        return outcome_from_error(err);
                    }
                    // A 404 or decode failure on one endpoint says nothing
                    // about the other; keep trying.
                }
            }
        }
        StrategyOutcome::Empty
    }
}
