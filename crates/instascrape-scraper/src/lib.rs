//! Multi-strategy profile extraction pipeline.
//!
//! Public-data scraping against a hostile target: a priority-ordered chain
//! of extraction strategies (JSON endpoints, embedded page state, linked
//! data, meta tags) behind identity rotation and randomized pacing, with a
//! curated fallback store as the last resort. See [`pipeline::ProfileScraper`]
//! for the entry points.

pub mod client;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod identity;
pub mod normalize;
pub mod parse;
mod parse_helpers;
pub mod pipeline;
pub mod rate_limit;
pub mod types;

pub use client::ProfileClient;
pub use error::{ScrapeOutcomeError, ScraperError};
pub use extract::{default_strategies, ExtractStrategy};
pub use fallback::FallbackStore;
pub use pipeline::{BatchFailure, BatchReport, CancelFlag, ProfileScraper};
pub use types::{RawProfile, StrategyOutcome};
