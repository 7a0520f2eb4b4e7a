//! Domain module - listing entities and site constants
//!
//! Plain data types shared by the extraction pipeline, the calendar writers
//! and the orchestrator. Nothing in here performs I/O.

pub mod constants;
pub mod showtime;

pub use showtime::{DayHeading, EventRecord, FilmBlock, ShowtimeRow};
