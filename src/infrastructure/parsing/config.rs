//! Parsing configuration for listing extraction
//!
//! Centralized CSS selectors describing the shape of the what's-on page.

use serde::{Deserialize, Serialize};

/// CSS selectors for the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One film block per match, searched from the document root
    pub film_block: String,

    /// Film title inside a block (required)
    pub title: String,

    /// Link to the film's detail page
    pub film_link: String,

    /// Free-text synopsis
    pub description: String,

    /// Badges such as "15", "35mm", "142 mins"
    pub runtime_badge: String,

    /// Ordered children of the performance list: headings and rows
    pub performance_item: String,

    /// A performance item that names a day
    pub day_heading: String,

    /// A performance item that is a showtime
    pub showtime_row: String,

    /// Booking control of a bookable showtime
    pub bookable_control: String,

    /// Booking control of a sold-out showtime
    pub sold_out_control: String,

    /// Clock label inside a booking control
    pub time_label: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            film_block: ".jacrofilm-list .jacro-event".to_string(),
            title: ".liveeventtitle".to_string(),
            film_link: ".film_img > a[href]".to_string(),
            description: ".jacrofilm-list-content > .jacro-formatted-text".to_string(),
            runtime_badge: ".running-time > span".to_string(),
            performance_item: ".performance-list-items > *".to_string(),
            day_heading: ".heading".to_string(),
            showtime_row: "li".to_string(),
            bookable_control: ".film_book_button".to_string(),
            sold_out_control: ".soldfilm_book_button".to_string(),
            time_label: ".time".to_string(),
        }
    }
}
