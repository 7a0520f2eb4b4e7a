//! Listing extractor: film blocks and their showtime rows
//!
//! Walks every film block under a root element, reads the film's metadata
//! once, then scans the block's performance list in document order carrying
//! the most recent day heading along. Each showtime row becomes a
//! [`RowOutcome`]; failures of a single row are logged and dropped while the
//! scan carries on.

use chrono::Duration;
use scraper::{ElementRef, Selector};
use tracing::{debug, error, warn};
use url::Url;

use super::config::ListingSelectors;
use super::context::ExtractionContext;
use super::date_resolver;
use super::text::first_runtime;
use super::{ParsingError, ParsingResult};
use crate::domain::showtime::compose_description;
use crate::domain::{DayHeading, EventRecord, FilmBlock, ShowtimeRow};

/// Counts for one extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub blocks: usize,
    pub emitted: usize,
    pub skipped_rows: usize,
    pub failed_rows: usize,
    /// Blocks dropped because a showtime row came before any day heading
    pub aborted_blocks: usize,
}

/// A showtime row that could not be turned into an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub heading: DayHeading,
    pub time_text: String,
    pub error: ParsingError,
}

/// Result of one showtime row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Emitted(EventRecord),
    /// Row without a booking control, e.g. a placeholder
    Skipped,
    Failed(RowFailure),
}

/// Scan accumulator threaded through a block's performance items
#[derive(Debug, Default)]
struct ScanState {
    heading: Option<DayHeading>,
    outcomes: Vec<RowOutcome>,
}

/// Extracts calendar events from a listing page
pub struct ListingExtractor {
    film_block: Selector,
    title: Selector,
    film_link: Selector,
    description: Selector,
    runtime_badge: Selector,
    performance_item: Selector,
    day_heading: Selector,
    showtime_row: Selector,
    booking_control: Selector,
    sold_out_control: Selector,
    time_label: Selector,
}

impl ListingExtractor {
    /// Create an extractor with the default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create an extractor with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        let booking_control = format!(
            "{}, {}",
            selectors.bookable_control, selectors.sold_out_control
        );

        Ok(Self {
            film_block: compile_selector(&selectors.film_block)?,
            title: compile_selector(&selectors.title)?,
            film_link: compile_selector(&selectors.film_link)?,
            description: compile_selector(&selectors.description)?,
            runtime_badge: compile_selector(&selectors.runtime_badge)?,
            performance_item: compile_selector(&selectors.performance_item)?,
            day_heading: compile_selector(&selectors.day_heading)?,
            showtime_row: compile_selector(&selectors.showtime_row)?,
            booking_control: compile_selector(&booking_control)?,
            sold_out_control: compile_selector(&selectors.sold_out_control)?,
            time_label: compile_selector(&selectors.time_label)?,
        })
    }

    /// Emit one event per valid showtime under `root`, in document order.
    ///
    /// Row-level failures are logged and counted. A showtime row ahead of any
    /// day heading drops that block's events and the pass moves on to the
    /// next block. A film block without a title aborts the pass; events of
    /// earlier blocks have already been emitted by then.
    pub fn extract<F>(
        &self,
        root: ElementRef<'_>,
        context: &ExtractionContext,
        mut emit: F,
    ) -> ParsingResult<ExtractionSummary>
    where
        F: FnMut(EventRecord),
    {
        let mut summary = ExtractionSummary::default();

        for block in root.select(&self.film_block) {
            summary.blocks += 1;
            let film = self.read_film_block(block, context)?;
            debug!(title = %film.title, runtime = ?film.runtime_minutes, "Scanning film block");

            let outcomes = match self.scan_block(block, &film, context) {
                Ok(outcomes) => outcomes,
                Err(e) if e.aborts_block() => {
                    summary.aborted_blocks += 1;
                    error!(
                        title = %film.title,
                        error = %e,
                        "Abandoning film block with malformed performance list"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            for outcome in outcomes {
                match outcome {
                    RowOutcome::Emitted(event) => {
                        summary.emitted += 1;
                        emit(event);
                    }
                    RowOutcome::Skipped => summary.skipped_rows += 1,
                    RowOutcome::Failed(failure) => {
                        summary.failed_rows += 1;
                        warn!(
                            title = %film.title,
                            film_url = ?film.film_url,
                            description = ?film.description,
                            runtime = ?film.runtime_minutes,
                            heading = %failure.heading.as_str(),
                            time = %failure.time_text,
                            error = %failure.error,
                            "Dropping showtime that could not be resolved"
                        );
                    }
                }
            }
        }

        debug!(
            "Extracted {} events from {} film blocks ({} skipped, {} failed, {} blocks abandoned)",
            summary.emitted,
            summary.blocks,
            summary.skipped_rows,
            summary.failed_rows,
            summary.aborted_blocks
        );
        Ok(summary)
    }

    /// Read a film's metadata from its block
    pub fn read_film_block(
        &self,
        block: ElementRef<'_>,
        context: &ExtractionContext,
    ) -> ParsingResult<FilmBlock> {
        let title = block
            .select(&self.title)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ParsingError::required_field_missing("title", Some("film block")))?;

        let film_url = block
            .select(&self.film_link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| match resolve_href(href, context.base_url.as_ref()) {
                Ok(url) => Some(url),
                Err(e) => {
                    debug!("Ignoring detail link of '{}': {}", title, e);
                    None
                }
            });

        let description = block
            .select(&self.description)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty());

        let badges: Vec<String> = block.select(&self.runtime_badge).map(element_text).collect();
        let runtime_minutes = first_runtime(badges.iter().map(String::as_str));

        Ok(FilmBlock {
            title,
            film_url,
            description,
            runtime_minutes,
        })
    }

    /// Fold over the block's performance items, carrying the current heading.
    fn scan_block(
        &self,
        block: ElementRef<'_>,
        film: &FilmBlock,
        context: &ExtractionContext,
    ) -> ParsingResult<Vec<RowOutcome>> {
        let state = block.select(&self.performance_item).try_fold(
            ScanState::default(),
            |mut state, item| -> ParsingResult<ScanState> {
                if self.day_heading.matches(&item) {
                    state.heading = Some(DayHeading::new(element_text(item)));
                } else if self.showtime_row.matches(&item) {
                    let Some(heading) = state.heading.as_ref() else {
                        return Err(ParsingError::HeadingMissing {
                            title: film.title.clone(),
                            time_text: self.time_text(item).unwrap_or_default(),
                        });
                    };
                    let outcome = self.row_outcome(item, heading, film, context)?;
                    state.outcomes.push(outcome);
                }
                Ok(state)
            },
        )?;

        Ok(state.outcomes)
    }

    fn row_outcome(
        &self,
        row: ElementRef<'_>,
        heading: &DayHeading,
        film: &FilmBlock,
        context: &ExtractionContext,
    ) -> ParsingResult<RowOutcome> {
        let Some(control) = row.select(&self.booking_control).next() else {
            return Ok(RowOutcome::Skipped);
        };

        let time_text = self.time_text(control).unwrap_or_default();
        let event = self
            .read_showtime(control, &time_text, context)
            .and_then(|showtime| build_event(film, heading, &showtime, context));

        match event {
            Ok(event) => Ok(RowOutcome::Emitted(event)),
            Err(error) if error.is_row_recoverable() => Ok(RowOutcome::Failed(RowFailure {
                heading: heading.clone(),
                time_text,
                error,
            })),
            Err(error) => Err(error),
        }
    }

    fn read_showtime(
        &self,
        control: ElementRef<'_>,
        time_text: &str,
        context: &ExtractionContext,
    ) -> ParsingResult<ShowtimeRow> {
        if time_text.is_empty() {
            return Err(ParsingError::malformed_input(time_text, "showtime has no time label"));
        }

        let booking_url = match control.value().attr("href") {
            Some(href) => resolve_href(href, context.base_url.as_ref())?,
            None => String::new(),
        };

        Ok(ShowtimeRow {
            time_text: time_text.to_string(),
            booking_url,
            sold_out: self.sold_out_control.matches(&control),
        })
    }

    fn time_text(&self, element: ElementRef<'_>) -> Option<String> {
        element.select(&self.time_label).next().map(element_text)
    }
}

/// Resolve a showtime against its heading and attach the film's metadata.
pub fn build_event(
    film: &FilmBlock,
    heading: &DayHeading,
    showtime: &ShowtimeRow,
    context: &ExtractionContext,
) -> ParsingResult<EventRecord> {
    let start = date_resolver::resolve(
        heading.as_str(),
        &showtime.time_text,
        &context.reference_now,
        context.timezone,
    )?;
    let runtime = film
        .runtime_minutes
        .filter(|minutes| *minutes > 0)
        .unwrap_or(context.default_runtime_minutes);
    let end = start + Duration::minutes(i64::from(runtime));

    Ok(EventRecord {
        title: film.title.clone(),
        start,
        end,
        url: showtime.booking_url.clone(),
        description: compose_description(
            showtime.sold_out,
            film.film_url.as_deref(),
            film.description.as_deref(),
        ),
        sold_out: showtime.sold_out,
    })
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, &e.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolve an href against the page URL. Without a base the href is kept as written.
fn resolve_href(href: &str, base_url: Option<&Url>) -> ParsingResult<String> {
    let Some(base) = base_url else {
        return Ok(href.to_string());
    };

    base.join(href)
        .map(|url| url.to_string())
        .map_err(|e| ParsingError::UrlResolutionFailed {
            url: href.to_string(),
            reason: e.to_string(),
        })
}
