//! Infrastructure layer for parsing, fetching and external integrations
//!
//! This module provides the listing parser, the page fetcher, calendar
//! serialization, configuration and logging.

pub mod calendar_writer;
pub mod config; // Configuration loading and defaults
pub mod logging; // Logging infrastructure
pub mod parsing; // Listing extraction and date resolution
pub mod parsing_error;
pub mod simple_http_client;

// Re-export commonly used items
pub use calendar_writer::{CalendarFormat, CalendarWriter, IcsCalendar, JsonFeed};
pub use config::{AppConfig, ConfigManager};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{ExtractionContext, ListingExtractor, ParsingError, ParsingResult};
pub use simple_http_client::{HttpClient, HttpClientConfig, PageFetcher};
