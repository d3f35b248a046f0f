//! Events volunteers can sign up for.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RoosterError, RoosterResult};

/// A named activity spanning one or more calendar days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Date-only. Either bound may be missing in the store, in which case
    /// the event has no day span.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl Event {
    /// Both bounds present and equal.
    pub fn is_single_day(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(s), Some(e)) if s == e)
    }

    /// Human-readable span, e.g. "2024-08-10 – 2024-08-12" or "no dates".
    pub fn render_span(&self) -> String {
        match (self.start_date, self.end_date) {
            (Some(s), Some(e)) if s == e => s.format("%Y-%m-%d").to_string(),
            (Some(s), Some(e)) => format!("{} – {}", s.format("%Y-%m-%d"), e.format("%Y-%m-%d")),
            (Some(s), None) => format!("{} – ?", s.format("%Y-%m-%d")),
            (None, Some(e)) => format!("? – {}", e.format("%Y-%m-%d")),
            (None, None) => "no dates".to_string(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fields for an event about to be created by an admin.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl EventDraft {
    pub fn validate(&self) -> RoosterResult<()> {
        if self.name.trim().is_empty() {
            return Err(RoosterError::validation("Event name is required"));
        }
        if self.start_date > self.end_date {
            return Err(RoosterError::validation(format!(
                "End date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(name: &str, start: &str, end: &str) -> EventDraft {
        EventDraft {
            name: name.to_string(),
            start_date: date(start),
            end_date: date(end),
            description: None,
            location: None,
        }
    }

    #[test]
    fn draft_accepts_same_day() {
        assert!(draft("Fair", "2024-08-10", "2024-08-10").validate().is_ok());
    }

    #[test]
    fn draft_rejects_reversed_span() {
        let err = draft("Fair", "2024-08-12", "2024-08-10").validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn draft_rejects_blank_name() {
        assert!(draft("   ", "2024-08-10", "2024-08-11").validate().is_err());
    }

    #[test]
    fn render_span_variants() {
        let mut event = Event {
            id: "rec1".into(),
            name: "Fair".into(),
            start_date: Some(date("2024-08-10")),
            end_date: Some(date("2024-08-10")),
            description: None,
            location: None,
        };
        assert_eq!(event.render_span(), "2024-08-10");
        assert!(event.is_single_day());

        event.end_date = Some(date("2024-08-12"));
        assert_eq!(event.render_span(), "2024-08-10 – 2024-08-12");
        assert!(!event.is_single_day());

        event.start_date = None;
        assert_eq!(event.render_span(), "? – 2024-08-12");
    }
}
