//! Scrape command handlers for the CLI.
//!
//! These are called from `main` after config and logging are established.
//! Per-profile failures are reported in the output and the exit status
//! rather than aborting the run, so one bad handle does not cost a batch.

use instascrape_core::AppConfig;
use instascrape_scraper::{
    default_strategies, CancelFlag, FallbackStore, ProfileClient, ProfileScraper,
};

/// Scrape the given identifiers and print records as JSON to stdout.
///
/// A single identifier goes through `scrape_one` and prints one record; a
/// list goes through the paced batch path and prints a report with both
/// successes and failures. Ctrl-C stops a batch at the next item boundary.
///
/// # Errors
///
/// Returns an error if the curated profiles file or HTTP client cannot be
/// set up, if a single-profile scrape fails, or if a batch ends with no
/// successful records.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    identifiers: &[String],
    pretty: bool,
) -> anyhow::Result<()> {
    let scraper = build_scraper(config)?;

    if let [identifier] = identifiers {
        let record = scraper.scrape_one(identifier).await?;
        print_json(&record, pretty)?;
        return Ok(());
    }

    let cancel = CancelFlag::new();
    let ctrlc_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, finishing current item then stopping");
            ctrlc_flag.cancel();
        }
    });

    let report = scraper.scrape_many(identifiers, &cancel).await;

    let output = serde_json::json!({
        "succeeded": report.succeeded,
        "failed": report
            .failed
            .iter()
            .map(|f| serde_json::json!({"identifier": f.identifier, "reason": f.reason}))
            .collect::<Vec<_>>(),
        "cancelled": report.cancelled,
    });
    print_json(&output, pretty)?;

    eprintln!(
        "{} succeeded, {} failed{}",
        report.succeeded.len(),
        report.failed.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    );

    if report.succeeded.is_empty() {
        anyhow::bail!("no profiles could be scraped");
    }
    Ok(())
}

/// Print the effective configuration and validate the curated profiles file.
///
/// # Errors
///
/// Returns an error if the profiles file is missing, unparseable, or fails
/// validation.
pub(crate) fn run_check_config(config: &AppConfig) -> anyhow::Result<()> {
    let profiles = instascrape_core::load_profiles(&config.profiles_path)?;

    println!("environment:       {}", config.env);
    println!("log level:         {}", config.log_level);
    println!("base url:          {}", config.base_url);
    println!("profiles file:     {}", config.profiles_path.display());
    println!("curated profiles:  {}", profiles.profiles.len());
    println!("request timeout:   {}s", config.request_timeout_secs);
    println!(
        "request delay:     {}..{}ms",
        config.min_delay_ms, config.max_delay_ms
    );
    println!(
        "batch delay:       {}..{}ms",
        config.batch_min_delay_ms, config.batch_max_delay_ms
    );
    println!("block backoff:     {}s", config.block_backoff_secs);
    println!("max batch size:    {}", config.max_batch_size);
    Ok(())
}

fn build_scraper(config: &AppConfig) -> anyhow::Result<ProfileScraper> {
    let profiles = instascrape_core::load_profiles(&config.profiles_path)?;
    let client = ProfileClient::new(config)?;
    Ok(ProfileScraper::new(
        client,
        default_strategies(),
        FallbackStore::new(profiles),
        config,
    ))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
