use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use showtime_calendar::application::ShowtimeFeedService;
use showtime_calendar::infrastructure::{
    CalendarFormat, ConfigManager, HttpClient, HttpClientConfig, init_logging_with_config,
};

/// Scrape a cinema listing into a calendar file
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Destination file
    #[arg(default_value = "out.ics")]
    dest: PathBuf,

    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listing page to scrape instead of the configured one
    #[arg(long)]
    url: Option<String>,

    /// IANA timezone of the listing
    #[arg(long)]
    timezone: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = CalendarFormat::Ics)]
    format: CalendarFormat,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let manager = ConfigManager::new(cli.config);
    let config = manager
        .load_config()
        .await?
        .with_source_overrides(cli.url, cli.timezone);
    config.validate()?;

    init_logging_with_config(&config.logging, config.timezone()?)?;
    match &manager.config_path {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    let client = HttpClient::with_config(HttpClientConfig::from_http_config(&config.http))
        .context("Failed to set up page fetcher")?;
    let service = ShowtimeFeedService::new(Arc::new(client), config)?;

    let report = service
        .run(chrono::Utc::now(), cli.format, &cli.dest)
        .await?;

    println!(
        "wrote {} events to {}",
        report.event_count,
        report.destination.display()
    );
    Ok(())
}
