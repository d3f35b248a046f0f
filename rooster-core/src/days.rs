//! Day spans of events.

use chrono::NaiveDate;

use crate::model::Event;

/// Every calendar day from `start_date` through `end_date`, inclusive.
///
/// Returns an empty list when either bound is missing (the event has no
/// valid span) or when the bounds are reversed. Iteration is on dates,
/// so daylight-saving transitions can't skip or repeat a day.
pub fn expand_days(event: &Event) -> Vec<NaiveDate> {
    match (event.start_date, event.end_date) {
        (Some(start), Some(end)) => days_between(start, end),
        _ => Vec::new(),
    }
}

/// Inclusive date range; empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Parse YYYY-MM-DD
pub fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
