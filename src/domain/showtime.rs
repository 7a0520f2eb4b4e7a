use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use super::constants::showtime::SOLD_OUT_MARKER;

/// Metadata of one film, read once per film block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmBlock {
    pub title: String,
    pub film_url: Option<String>,
    pub description: Option<String>,
    /// First "<N> mins" badge in markup order
    pub runtime_minutes: Option<u32>,
}

/// Label scoping the showtime rows that follow it, e.g. "Friday 12 October"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeading(pub String);

impl DayHeading {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One bookable or sold-out time slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowtimeRow {
    /// Clock time as printed, "h:mm am/pm"
    pub time_text: String,
    pub booking_url: String,
    pub sold_out: bool,
}

/// Normalized calendar event, one per valid showtime row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub url: String,
    pub description: String,
    pub sold_out: bool,
}

impl EventRecord {
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }
}

/// Joins the description segments as `[sold out] <film url>\n\n<description>`.
///
/// Empty segments still keep their separator so consumers can split on the
/// blank line.
pub fn compose_description(sold_out: bool, film_url: Option<&str>, description: Option<&str>) -> String {
    let marker = if sold_out { SOLD_OUT_MARKER } else { "" };
    format!(
        "{marker}{}\n\n{}",
        film_url.unwrap_or_default(),
        description.unwrap_or_default()
    )
}
