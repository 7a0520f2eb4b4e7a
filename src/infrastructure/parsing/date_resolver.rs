//! Resolution of yearless showtime labels into absolute timestamps
//!
//! A listing prints "Friday 12 October" above "7:30 pm" and never a year.
//! The year is taken as the next current-or-future occurrence of that day
//! relative to a caller-supplied reference instant, so the same inputs always
//! resolve to the same instant.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::text::parse_clock_time;
use super::{ParsingError, ParsingResult};
use crate::domain::constants::showtime::MONTH_NAMES;

/// Day-of-month and month (1-12) named by a day heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingDate {
    pub day: u32,
    pub month: u32,
}

/// Read "Weekday D Month". The weekday is decorative and never checked.
pub fn parse_day_heading(heading: &str) -> ParsingResult<HeadingDate> {
    let mut parts = heading.split_whitespace();
    let (Some(_weekday), Some(day), Some(month_name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParsingError::malformed_input(
            heading,
            "expected '<weekday> <day> <month>'",
        ));
    };

    let month_index = MONTH_NAMES
        .iter()
        .position(|name| *name == month_name)
        .ok_or_else(|| ParsingError::unknown_month(month_name))?;
    let day = day
        .parse()
        .map_err(|_| ParsingError::malformed_input(heading, "day of month is not a number"))?;

    Ok(HeadingDate {
        day,
        // MONTH_NAMES has twelve entries
        month: u32::try_from(month_index + 1).unwrap_or(12),
    })
}

/// Year in which `date` next occurs on or after `today`.
pub fn resolve_year(date: HeadingDate, today: NaiveDate) -> i32 {
    let already_passed =
        date.month < today.month() || (date.month == today.month() && date.day < today.day());
    if already_passed {
        today.year() + 1
    } else {
        today.year()
    }
}

/// Resolve a day heading and a clock label to an instant in `timezone`.
///
/// Fails with `UnknownMonth` for month names outside the canonical list and
/// with `MalformedInput` for bad labels, impossible dates, and local times
/// that are skipped or repeated by a DST transition.
pub fn resolve(
    day_heading: &str,
    time_text: &str,
    reference_now: &DateTime<Tz>,
    timezone: Tz,
) -> ParsingResult<DateTime<Tz>> {
    let date = parse_day_heading(day_heading)?;
    let clock = parse_clock_time(time_text)?;

    let today = reference_now.with_timezone(&timezone).date_naive();
    let year = resolve_year(date, today);

    let calendar_date = NaiveDate::from_ymd_opt(year, date.month, date.day).ok_or_else(|| {
        ParsingError::malformed_input(day_heading, &format!("no such date in {year}"))
    })?;
    let time_of_day = NaiveTime::from_hms_opt(clock.hour_24(), clock.minute, 0)
        .ok_or_else(|| ParsingError::malformed_input(time_text, "not a valid time of day"))?;

    let local = calendar_date.and_time(time_of_day);
    timezone.from_local_datetime(&local).single().ok_or_else(|| {
        ParsingError::malformed_input(
            &format!("{day_heading} {time_text}"),
            &format!("{local} is not a single instant in {timezone}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Europe::London;

    fn reference(year: i32, month: u32, day: u32) -> DateTime<Tz> {
        London.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn local(dt: &DateTime<Tz>) -> (i32, u32, u32, u32, u32) {
        (dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute())
    }

    #[test]
    fn test_earlier_month_rolls_into_next_year() {
        let start = resolve("Friday 1 January", "7:00 pm", &reference(2024, 6, 15), London).unwrap();
        assert_eq!(local(&start), (2025, 1, 1, 19, 0));
    }

    #[test]
    fn test_later_day_in_current_month_stays_in_current_year() {
        let start = resolve("Monday 20 June", "7:00 pm", &reference(2024, 6, 15), London).unwrap();
        assert_eq!(local(&start), (2024, 6, 20, 19, 0));
    }

    #[test]
    fn test_same_day_is_not_in_the_past() {
        let start = resolve("Saturday 15 June", "9:45 pm", &reference(2024, 6, 15), London).unwrap();
        assert_eq!(local(&start), (2024, 6, 15, 21, 45));
    }

    #[test]
    fn test_earlier_day_in_current_month_rolls_over() {
        let start = resolve("Sunday 14 June", "1:00 pm", &reference(2024, 6, 15), London).unwrap();
        assert_eq!(local(&start), (2025, 6, 14, 13, 0));
    }

    #[test]
    fn test_weekday_is_not_validated() {
        let start = resolve("Caturday 12 October", "8:15 pm", &reference(2024, 6, 15), London).unwrap();
        assert_eq!(local(&start), (2024, 10, 12, 20, 15));
    }

    #[test]
    fn test_reference_is_read_in_target_timezone() {
        // 23:30 UTC on 14 June is already 15 June in London (BST).
        let reference_now = chrono::Utc
            .with_ymd_and_hms(2024, 6, 14, 23, 30, 0)
            .unwrap()
            .with_timezone(&London);
        let start = resolve("Friday 14 June", "7:00 pm", &reference_now, London).unwrap();
        assert_eq!(start.year(), 2025);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let now = reference(2024, 6, 15);
        let first = resolve("Friday 12 October", "7:30 pm", &now, London).unwrap();
        let second = resolve("Friday 12 October", "7:30 pm", &now, London).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_month() {
        let err = resolve("Friday 12 Oktober", "7:30 pm", &reference(2024, 6, 15), London).unwrap_err();
        assert_eq!(err, ParsingError::unknown_month("Oktober"));
    }

    #[test]
    fn test_malformed_time_text() {
        let err = resolve("Friday 12 October", "19:30", &reference(2024, 6, 15), London).unwrap_err();
        assert!(matches!(err, ParsingError::MalformedInput { .. }));
    }

    #[test]
    fn test_malformed_heading() {
        for heading in ["Friday", "Friday 12", "Friday twelve October", ""] {
            let err = resolve(heading, "7:30 pm", &reference(2024, 6, 15), London).unwrap_err();
            assert!(matches!(err, ParsingError::MalformedInput { .. }), "{heading}");
        }
    }

    #[test]
    fn test_impossible_calendar_date() {
        let err = resolve("Monday 31 September", "7:30 pm", &reference(2024, 6, 15), London).unwrap_err();
        assert!(matches!(err, ParsingError::MalformedInput { .. }));
    }

    #[test]
    fn test_twelve_pm_is_not_a_time_of_day() {
        let err = resolve("Friday 12 October", "12:30 pm", &reference(2024, 6, 15), London).unwrap_err();
        assert!(matches!(err, ParsingError::MalformedInput { .. }));

        let start = resolve("Friday 12 October", "12:30 am", &reference(2024, 6, 15), London).unwrap();
        assert_eq!(local(&start), (2024, 10, 12, 12, 30));
    }

    #[test]
    fn test_spring_forward_gap_is_rejected() {
        // Clocks jump from 01:00 to 02:00 on 30 March 2025.
        let err = resolve("Sunday 30 March", "1:30 am", &reference(2025, 3, 1), London).unwrap_err();
        assert!(matches!(err, ParsingError::MalformedInput { .. }));
    }

    #[test]
    fn test_fall_back_overlap_is_rejected() {
        // 01:00-02:00 happens twice on 27 October 2024.
        let err = resolve("Sunday 27 October", "1:30 am", &reference(2024, 10, 1), London).unwrap_err();
        assert!(matches!(err, ParsingError::MalformedInput { .. }));
    }

    #[test]
    fn test_heading_date() {
        assert_eq!(
            parse_day_heading("Friday  12   October").unwrap(),
            HeadingDate { day: 12, month: 10 }
        );
    }
}
