//! Extraction context
//!
//! Everything the extractor needs besides the DOM itself. The reference
//! instant is always supplied by the caller; nothing below reads the clock.

use chrono::DateTime;
use chrono_tz::Tz;
use url::Url;

use crate::domain::constants::showtime::DEFAULT_RUNTIME_MINUTES;

/// Context information for one extraction pass
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// Instant used to pick the year of yearless day headings
    pub reference_now: DateTime<Tz>,

    /// Zone every resolved showtime is expressed in
    pub timezone: Tz,

    /// Page URL for resolving relative links
    pub base_url: Option<Url>,

    /// Runtime used when a film carries no runtime badge
    pub default_runtime_minutes: u32,
}

impl ExtractionContext {
    pub fn new(reference_now: DateTime<Tz>, timezone: Tz) -> Self {
        Self {
            reference_now,
            timezone,
            base_url: None,
            default_runtime_minutes: DEFAULT_RUNTIME_MINUTES,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Zero is ignored so that every event keeps a positive duration.
    pub fn with_default_runtime(mut self, minutes: u32) -> Self {
        if minutes > 0 {
            self.default_runtime_minutes = minutes;
        }
        self
    }
}
