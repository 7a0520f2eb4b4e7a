//! Parsing error types for listing extraction
//!
//! Row-level failures (bad time text, unknown month, unresolvable booking
//! link) are recovered by the extractor. A showtime row ahead of any day
//! heading abandons its film block; every other failure aborts the run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Malformed input '{input}': {reason}")]
    MalformedInput { input: String, reason: String },

    #[error("Unknown month name '{month}'")]
    UnknownMonth { month: String },

    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Showtime '{time_text}' of '{title}' appears before any day heading")]
    HeadingMissing { title: String, time_text: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },
}

impl ParsingError {
    pub fn malformed_input(input: &str, reason: &str) -> Self {
        Self::MalformedInput {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unknown_month(month: &str) -> Self {
        Self::UnknownMonth {
            month: month.to_string(),
        }
    }

    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the extractor may drop the offending row and keep scanning
    pub const fn is_row_recoverable(&self) -> bool {
        match self {
            Self::MalformedInput { .. }
            | Self::UnknownMonth { .. }
            | Self::UrlResolutionFailed { .. } => true,
            Self::RequiredFieldMissing { .. }
            | Self::HeadingMissing { .. }
            | Self::InvalidSelector { .. } => false,
        }
    }

    /// Whether the extractor drops the current film block and moves on to the next
    pub const fn aborts_block(&self) -> bool {
        matches!(self, Self::HeadingMissing { .. })
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
