//! Listing parsing infrastructure
//!
//! Date resolution, free-text micro-parsers and the DOM walk that turns a
//! what's-on page into calendar events.

pub mod config;
pub mod context;
pub mod date_resolver;
pub mod error;
pub mod listing_extractor;
pub mod text;

// Re-export public types
pub use config::ListingSelectors;
pub use context::ExtractionContext;
pub use date_resolver::resolve;
pub use error::{ParsingError, ParsingResult};
pub use listing_extractor::{ExtractionSummary, ListingExtractor, RowFailure, RowOutcome};
