//! Showtime Calendar - cinema listing to calendar feed
//!
//! Scrapes a cinema's what's-on page, resolves each yearless showtime into an
//! absolute timestamp and emits normalized calendar events.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{FeedReport, ShowtimeFeedService};
pub use domain::EventRecord;
pub use infrastructure::parsing::{ExtractionContext, ListingExtractor, resolve};
