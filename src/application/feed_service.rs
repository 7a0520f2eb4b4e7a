//! Showtime feed use case: fetch, extract, write
//!
//! The reference instant is passed in by the caller and used both to resolve
//! yearless showtimes and as the calendar's generation stamp.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use scraper::Html;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::info;
use url::Url;

use crate::infrastructure::calendar_writer::{CalendarFormat, CalendarWriter};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::parsing::{ExtractionContext, ExtractionSummary, ListingExtractor};
use crate::infrastructure::simple_http_client::PageFetcher;

/// Outcome of one feed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedReport {
    pub summary: ExtractionSummary,
    pub event_count: usize,
    pub destination: PathBuf,
}

pub struct ShowtimeFeedService {
    fetcher: Arc<dyn PageFetcher>,
    extractor: ListingExtractor,
    config: AppConfig,
    timezone: Tz,
}

impl ShowtimeFeedService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: AppConfig) -> Result<Self> {
        let timezone = config.timezone()?;
        let extractor = ListingExtractor::with_config(&config.selectors)
            .context("Invalid listing selectors")?;

        Ok(Self {
            fetcher,
            extractor,
            config,
            timezone,
        })
    }

    /// Fetch the listing, extract every showtime and write the calendar to `destination`.
    pub async fn run(
        &self,
        reference_now: DateTime<Utc>,
        format: CalendarFormat,
        destination: &Path,
    ) -> Result<FeedReport> {
        let url = &self.config.source.url;
        let html = self
            .fetcher
            .fetch_document(url)
            .await
            .with_context(|| format!("Failed to fetch listing {url}"))?;

        let (summary, writer) = self.build_calendar(&html, reference_now, format)?;
        let event_count = writer.event_count();

        fs::write(destination, writer.render())
            .await
            .with_context(|| format!("Failed to write calendar to {}", destination.display()))?;

        info!(
            "Wrote {} events to {} ({} rows skipped, {} rows dropped)",
            event_count,
            destination.display(),
            summary.skipped_rows,
            summary.failed_rows
        );

        Ok(FeedReport {
            summary,
            event_count,
            destination: destination.to_path_buf(),
        })
    }

    /// Parse `html` and feed each extracted event into a fresh calendar writer.
    pub fn build_calendar(
        &self,
        html: &str,
        reference_now: DateTime<Utc>,
        format: CalendarFormat,
    ) -> Result<(ExtractionSummary, Box<dyn CalendarWriter + Send>)> {
        let document = Html::parse_document(html);
        let base_url = Url::parse(&self.config.source.url)
            .with_context(|| format!("Invalid source URL {}", self.config.source.url))?;
        let context = ExtractionContext::new(reference_now.with_timezone(&self.timezone), self.timezone)
            .with_base_url(base_url)
            .with_default_runtime(self.config.source.default_runtime_minutes);

        let mut writer = format.writer(&self.config.source.calendar_name, reference_now);
        let summary = self
            .extractor
            .extract(document.root_element(), &context, |event| writer.add_event(&event))
            .context("Listing markup no longer matches the expected shape")?;

        Ok((summary, writer))
    }
}
