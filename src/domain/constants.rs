//! Site characteristics and domain constants
//!
//! Values describing the cinema listing this crate was built against.

/// Listing site constants
pub mod site {
    /// What's-on page holding every film block
    pub const LISTING_URL: &str = "https://princecharlescinema.com/whats-on/";

    /// Calendar name used when none is configured
    pub const CALENDAR_NAME: &str = "Prince Charles Cinema";

    /// IANA zone all showtimes are published in
    pub const TIMEZONE: &str = "Europe/London";
}

/// Showtime date/time rules
pub mod showtime {
    /// Canonical month names, indexed 0-11.
    pub const MONTH_NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    /// Runtime assumed when a film block carries no "<N> mins" badge
    pub const DEFAULT_RUNTIME_MINUTES: u32 = 90;

    /// Prefix added to the event description of a sold-out showtime
    pub const SOLD_OUT_MARKER: &str = "[sold out] ";
}
