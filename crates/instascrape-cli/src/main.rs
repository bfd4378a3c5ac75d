use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scrape;

#[derive(Debug, Parser)]
#[command(name = "instascrape")]
#[command(about = "Public profile scraper command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one or more profiles and print them as JSON.
    Scrape {
        /// Profile identifiers (handles), with or without a leading '@'.
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Load and print the effective configuration, validating the curated
    /// profiles file along the way.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = instascrape_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape {
            identifiers,
            pretty,
        } => scrape::run_scrape(&config, &identifiers, pretty).await,
        Commands::CheckConfig => scrape::run_check_config(&config),
    }
}
