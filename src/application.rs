//! Application layer module
//!
//! Use cases that wire the page fetcher, the listing extractor and the
//! calendar writers together.

pub mod feed_service;

pub use feed_service::{FeedReport, ShowtimeFeedService};
