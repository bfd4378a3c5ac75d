//! Pipeline orchestration: runs the strategy chain for one identifier and
//! drives paced batches over many.
//!
//! The chain driver is the only place that interprets [`StrategyOutcome`]:
//! `Empty`, `Blocked`, and `Error` all mean "log and try the next strategy"
//! (with a backoff pause for `Blocked`), and only a `Success` carrying a
//! non-zero follower count short-circuits. When the chain is exhausted the
//! curated fallback store is the last stop; a miss there is the caller's
//! `NotFound`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use instascrape_core::{AppConfig, ProfileRecord};

use crate::client::ProfileClient;
use crate::error::ScrapeOutcomeError;
use crate::extract::ExtractStrategy;
use crate::fallback::FallbackStore;
use crate::rate_limit::RateLimiter;
use crate::types::StrategyOutcome;

/// Longest handle the target accepts.
const MAX_USERNAME_LEN: usize = 30;

/// Cooperative cancellation handle for batch runs.
///
/// Checked between items, never mid-item: an in-flight scrape always runs
/// to completion so the report never contains half-attempted entries.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One failed batch item with its caller-facing reason.
#[derive(Debug)]
pub struct BatchFailure {
    pub identifier: String,
    pub reason: String,
}

/// Outcome of a batch run. Items past a cancellation point appear in
/// neither list.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<ProfileRecord>,
    pub failed: Vec<BatchFailure>,
    pub cancelled: bool,
}

impl BatchReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

pub struct ProfileScraper {
    client: ProfileClient,
    strategies: Vec<Box<dyn ExtractStrategy>>,
    fallback: FallbackStore,
    batch_limiter: RateLimiter,
    max_batch_size: usize,
}

impl ProfileScraper {
    #[must_use]
    pub fn new(
        client: ProfileClient,
        strategies: Vec<Box<dyn ExtractStrategy>>,
        fallback: FallbackStore,
        config: &AppConfig,
    ) -> Self {
        Self {
            client,
            strategies,
            fallback,
            batch_limiter: RateLimiter::new(
                config.batch_min_delay_ms,
                config.batch_max_delay_ms,
                config.block_backoff_secs,
            ),
            max_batch_size: config.max_batch_size,
        }
    }

    /// Scrape a single profile, consulting the curated fallback store when
    /// every live strategy fails.
    ///
    /// # Errors
    ///
    /// [`ScrapeOutcomeError::InvalidUsername`] when the identifier cannot be
    /// a valid handle, [`ScrapeOutcomeError::NotFound`] when both the live
    /// chain and the fallback store come up empty. Transient faults never
    /// surface here.
    pub async fn scrape_one(&self, identifier: &str) -> Result<ProfileRecord, ScrapeOutcomeError> {
        let username = canonicalize_username(identifier)?;

        for strategy in &self.strategies {
            match strategy.attempt(&self.client, &username).await {
                StrategyOutcome::Success(record) if record.followers > 0 => {
                    tracing::info!(
                        username = %username,
                        strategy = strategy.name(),
                        followers = record.followers,
                        "profile extracted"
                    );
                    return Ok(record);
                }
                StrategyOutcome::Success(_) => {
                    tracing::debug!(
                        username = %username,
                        strategy = strategy.name(),
                        "zero follower count, treating as no data"
                    );
                }
                StrategyOutcome::Empty => {
                    tracing::debug!(
                        username = %username,
                        strategy = strategy.name(),
                        "strategy produced no data"
                    );
                }
                StrategyOutcome::Blocked => {
                    self.client.limiter().note_blocked().await;
                }
                StrategyOutcome::Error(err) => {
                    tracing::warn!(
                        username = %username,
                        strategy = strategy.name(),
                        error = %err,
                        "strategy failed"
                    );
                }
            }
        }

        if let Some(record) = self.fallback.lookup(&username) {
            tracing::info!(
                username = %username,
                "live extraction exhausted, serving curated fallback"
            );
            return Ok(record);
        }

        Err(ScrapeOutcomeError::NotFound { username })
    }

    /// Scrape a list of identifiers sequentially with randomized inter-item
    /// pacing, collecting per-item outcomes instead of failing the batch.
    ///
    /// Input beyond the configured batch cap is dropped with a warning. The
    /// cancel flag is honored between items.
    pub async fn scrape_many(&self, identifiers: &[String], cancel: &CancelFlag) -> BatchReport {
        let mut report = BatchReport::default();

        let batch = if identifiers.len() > self.max_batch_size {
            tracing::warn!(
                requested = identifiers.len(),
                cap = self.max_batch_size,
                "batch exceeds cap, truncating"
            );
            &identifiers[..self.max_batch_size]
        } else {
            identifiers
        };

        for (index, identifier) in batch.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(
                    attempted = report.attempted(),
                    remaining = batch.len() - index,
                    "batch cancelled"
                );
                report.cancelled = true;
                break;
            }
            if index > 0 {
                self.batch_limiter.throttle().await;
            }

            match self.scrape_one(identifier).await {
                Ok(record) => report.succeeded.push(record),
                Err(err) => {
                    tracing::warn!(identifier = %identifier, error = %err, "batch item failed");
                    let reason = match &err {
                        ScrapeOutcomeError::NotFound { .. } => "not found or private".to_string(),
                        other => other.to_string(),
                    };
                    report.failed.push(BatchFailure {
                        identifier: identifier.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "batch complete"
        );
        report
    }
}

/// Normalize a caller-supplied identifier to a canonical handle.
///
/// Trims whitespace, strips one leading `@`, lowercases, then enforces the
/// target's handle rules (1 to 30 characters from `a-z`, `0-9`, `.`, `_`).
fn canonicalize_username(identifier: &str) -> Result<String, ScrapeOutcomeError> {
    let trimmed = identifier.trim();
    let stripped = trimmed.strip_prefix('@').unwrap_or(trimmed);
    let username = stripped.to_lowercase();

    if username.is_empty() {
        return Err(ScrapeOutcomeError::InvalidUsername {
            username: identifier.to_string(),
            reason: "empty after trimming".to_string(),
        });
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ScrapeOutcomeError::InvalidUsername {
            username: identifier.to_string(),
            reason: format!("longer than {MAX_USERNAME_LEN} characters"),
        });
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '.' && *c != '_')
    {
        return Err(ScrapeOutcomeError::InvalidUsername {
            username: identifier.to_string(),
            reason: format!("contains disallowed character '{bad}'"),
        });
    }

    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_strips_handle_decoration() {
        assert_eq!(canonicalize_username("@LeoMessi").unwrap(), "leomessi");
        assert_eq!(canonicalize_username("  nasa  ").unwrap(), "nasa");
        assert_eq!(canonicalize_username("virat.kohli").unwrap(), "virat.kohli");
        assert_eq!(canonicalize_username("under_score").unwrap(), "under_score");
    }

    #[test]
    fn canonicalize_rejects_empty() {
        let err = canonicalize_username("   ").unwrap_err();
        assert!(matches!(err, ScrapeOutcomeError::InvalidUsername { .. }));
        let err = canonicalize_username("@").unwrap_err();
        assert!(matches!(err, ScrapeOutcomeError::InvalidUsername { .. }));
    }

    #[test]
    fn canonicalize_rejects_disallowed_characters() {
        for bad in ["with space", "semi;colon", "slash/y", "emoji😀"] {
            assert!(
                canonicalize_username(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn canonicalize_rejects_overlong_handles() {
        let long = "a".repeat(MAX_USERNAME_LEN + 1);
        assert!(canonicalize_username(&long).is_err());
        let max = "a".repeat(MAX_USERNAME_LEN);
        assert_eq!(canonicalize_username(&max).unwrap(), max);
    }

    #[test]
    fn cancel_flag_round_trip() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled(), "clones share the same flag");
    }
}
