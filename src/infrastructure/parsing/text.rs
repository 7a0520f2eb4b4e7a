//! Free-text micro-parsers for showtime labels and runtime badges
//!
//! Kept apart from DOM traversal so the listing markup and the text formats
//! can change independently.

use lazy_static::lazy_static;
use regex::Regex;

use super::{ParsingError, ParsingResult};

lazy_static! {
    static ref CLOCK_TIME: Regex =
        Regex::new(r"^(\d{1,2}):(\d{2}) (am|pm)$").expect("clock time pattern is valid");
    static ref RUNTIME_BADGE: Regex =
        Regex::new(r"^(\d+)\s*mins$").expect("runtime badge pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// A 12-hour clock label such as "7:30 pm"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Meridiem,
}

impl ClockTime {
    /// Hour on a 24-hour clock. "pm" adds twelve, with no noon/midnight correction,
    /// so "12:15 pm" yields 24.
    pub const fn hour_24(&self) -> u32 {
        match self.meridiem {
            Meridiem::Am => self.hour,
            Meridiem::Pm => self.hour + 12,
        }
    }
}

/// Parse a showtime label of the exact form `h:mm am` / `hh:mm pm`.
pub fn parse_clock_time(text: &str) -> ParsingResult<ClockTime> {
    let captures = CLOCK_TIME
        .captures(text)
        .ok_or_else(|| ParsingError::malformed_input(text, "expected 'h:mm am' or 'h:mm pm'"))?;

    // Both groups are at most two ASCII digits, so the parses cannot overflow.
    let hour = captures[1]
        .parse()
        .map_err(|_| ParsingError::malformed_input(text, "hour is not a number"))?;
    let minute = captures[2]
        .parse()
        .map_err(|_| ParsingError::malformed_input(text, "minute is not a number"))?;
    let meridiem = if &captures[3] == "pm" { Meridiem::Pm } else { Meridiem::Am };

    Ok(ClockTime {
        hour,
        minute,
        meridiem,
    })
}

/// Minutes from a single badge like "142 mins", `None` for any other badge.
pub fn parse_runtime_badge(text: &str) -> Option<u32> {
    RUNTIME_BADGE
        .captures(text.trim())
        .and_then(|captures| captures[1].parse().ok())
}

/// Runtime from the first badge that matches, in the order given.
pub fn first_runtime<'a, I>(badges: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    badges.into_iter().find_map(parse_runtime_badge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evening_time() {
        let time = parse_clock_time("7:30 pm").unwrap();
        assert_eq!(time.hour, 7);
        assert_eq!(time.minute, 30);
        assert_eq!(time.meridiem, Meridiem::Pm);
        assert_eq!(time.hour_24(), 19);
    }

    #[test]
    fn test_parse_morning_time() {
        let time = parse_clock_time("11:05 am").unwrap();
        assert_eq!(time.hour_24(), 11);
        assert_eq!(time.minute, 5);
    }

    #[test]
    fn test_twelve_pm_keeps_literal_arithmetic() {
        assert_eq!(parse_clock_time("12:15 pm").unwrap().hour_24(), 24);
        assert_eq!(parse_clock_time("12:15 am").unwrap().hour_24(), 12);
    }

    #[test]
    fn test_reject_labels_outside_the_pattern() {
        for text in ["19:00", "7:00", "7:00 noon", "7:00pm", " 7:00 pm", "7:00 PM", "107:00 pm"] {
            let err = parse_clock_time(text).unwrap_err();
            assert!(matches!(err, ParsingError::MalformedInput { .. }), "{text}");
        }
    }

    #[test]
    fn test_runtime_badge() {
        assert_eq!(parse_runtime_badge("142 mins"), Some(142));
        assert_eq!(parse_runtime_badge("  95mins "), Some(95));
        assert_eq!(parse_runtime_badge("15"), None);
        assert_eq!(parse_runtime_badge("2 hrs"), None);
        assert_eq!(parse_runtime_badge("142 minutes"), None);
    }

    #[test]
    fn test_first_matching_badge_wins() {
        let badges = ["15", "Subtitled", "120 mins", "180 mins"];
        assert_eq!(first_runtime(badges), Some(120));
        assert_eq!(first_runtime(["PG", "35mm"]), None);
        assert_eq!(first_runtime(std::iter::empty()), None);
    }
}
