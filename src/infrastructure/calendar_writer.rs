//! Calendar writers
//!
//! Serialize event records into a calendar document. `IcsCalendar` produces
//! RFC 5545 iCalendar text, `JsonFeed` a JSON array of the records.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::domain::EventRecord;

const PRODUCT_ID: &str = "-//showtime-calendar//EN";
const MAX_LINE_OCTETS: usize = 75;

/// Consumes event records and renders them as one document
pub trait CalendarWriter {
    fn add_event(&mut self, event: &EventRecord);

    fn event_count(&self) -> usize;

    fn render(&self) -> String;
}

/// Output formats understood by the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CalendarFormat {
    #[default]
    Ics,
    Json,
}

impl CalendarFormat {
    /// Writer for this format. `generated_at` becomes the ICS `DTSTAMP`.
    pub fn writer(self, name: &str, generated_at: DateTime<Utc>) -> Box<dyn CalendarWriter + Send> {
        match self {
            Self::Ics => Box::new(IcsCalendar::new(name, generated_at)),
            Self::Json => Box::new(JsonFeed::new(name)),
        }
    }
}

/// iCalendar document
#[derive(Debug, Clone)]
pub struct IcsCalendar {
    name: String,
    generated_at: DateTime<Utc>,
    events: Vec<EventRecord>,
}

impl IcsCalendar {
    pub fn new(name: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            generated_at,
            events: Vec::new(),
        }
    }

    fn push_event_lines(&self, lines: &mut Vec<String>, event: &EventRecord) {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", event_uid(event)));
        lines.push(format!("DTSTAMP:{}", utc_stamp(&self.generated_at)));
        lines.push(format!("DTSTART:{}", utc_stamp(&event.start)));
        lines.push(format!("DTEND:{}", utc_stamp(&event.end)));
        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
        if !event.url.is_empty() {
            lines.push(format!("URL:{}", event.url));
        }
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
        lines.push("END:VEVENT".to_string());
    }
}

impl CalendarWriter for IcsCalendar {
    fn add_event(&mut self, event: &EventRecord) {
        self.events.push(event.clone());
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn render(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODUCT_ID}"),
            "CALSCALE:GREGORIAN".to_string(),
            format!("NAME:{}", escape_text(&self.name)),
            format!("X-WR-CALNAME:{}", escape_text(&self.name)),
        ];
        if let Some(first) = self.events.first() {
            lines.push(format!("X-WR-TIMEZONE:{}", first.timezone()));
        }
        for event in &self.events {
            self.push_event_lines(&mut lines, event);
        }
        lines.push("END:VCALENDAR".to_string());

        lines.iter().map(|line| fold_line(line)).collect()
    }
}

/// JSON array of event records
#[derive(Debug, Clone)]
pub struct JsonFeed {
    name: String,
    events: Vec<EventRecord>,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    name: &'a str,
    events: &'a [EventRecord],
}

impl JsonFeed {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: Vec::new(),
        }
    }
}

impl CalendarWriter for JsonFeed {
    fn add_event(&mut self, event: &EventRecord) {
        self.events.push(event.clone());
    }

    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn render(&self) -> String {
        let document = JsonDocument {
            name: &self.name,
            events: &self.events,
        };
        // Plain strings, bools and RFC 3339 timestamps always serialize.
        serde_json::to_string_pretty(&document).unwrap_or_default()
    }
}

/// Stable identifier of a showtime: same booking link and start, same UID
fn event_uid(event: &EventRecord) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(event.title.as_bytes());
    hasher.update(b"\n");
    hasher.update(event.url.as_bytes());
    hasher.update(b"\n");
    hasher.update(event.start.to_rfc3339().as_bytes());
    let digest = hasher.finalize().to_hex();
    format!("{}@showtime-calendar", &digest[..32])
}

fn utc_stamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Fold a content line at 75 octets without splitting a UTF-8 sequence,
/// terminated by CRLF.
fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + 8);
    let mut octets = 0;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if octets + width > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            // the leading space counts towards the continuation line
            octets = 1;
        }
        folded.push(ch);
        octets += width;
    }
    folded.push_str("\r\n");
    folded
}
