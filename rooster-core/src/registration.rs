//! Volunteer registration sets and day selection for multi-day events.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::days::expand_days;
use crate::error::{RoosterError, RoosterResult};
use crate::model::Event;

/// Event ids a volunteer signed up for.
///
/// Stored as a list because that is what the record store keeps, but treated
/// as a set: `register` never adds a duplicate and `unregister` removes every
/// copy of an id that slipped in anyway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationSet(Vec<String>);

impl RegistrationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.0.iter().any(|id| id == event_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Idempotent.
    pub fn register(&self, event_id: &str) -> RegistrationSet {
        let mut ids = self.0.clone();
        if !self.contains(event_id) {
            ids.push(event_id.to_string());
        }
        RegistrationSet(ids)
    }

    /// Removing an id that isn't present is a no-op.
    pub fn unregister(&self, event_id: &str) -> RegistrationSet {
        RegistrationSet(self.0.iter().filter(|id| *id != event_id).cloned().collect())
    }
}

impl From<Vec<String>> for RegistrationSet {
    fn from(ids: Vec<String>) -> Self {
        RegistrationSet(ids)
    }
}

impl FromIterator<String> for RegistrationSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        RegistrationSet(iter.into_iter().collect())
    }
}

/// A validated sign-up for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    pub event_id: String,
    /// Empty for single-day events (and events without a span).
    pub selected_days: Vec<NaiveDate>,
}

impl RegistrationRequest {
    /// Check `selected_days` against the event's span.
    ///
    /// Multi-day events need at least one selected day, all within the span.
    /// Single-day events ignore the selection entirely.
    pub fn new(event: &Event, selected_days: &[NaiveDate]) -> RoosterResult<Self> {
        let span = expand_days(event);

        if span.len() <= 1 {
            return Ok(RegistrationRequest {
                event_id: event.id.clone(),
                selected_days: Vec::new(),
            });
        }

        if selected_days.is_empty() {
            return Err(RoosterError::validation(format!(
                "'{}' spans {} days. Select at least one day to register for.",
                event.name,
                span.len()
            )));
        }

        if let Some(outside) = selected_days.iter().find(|d| !span.contains(d)) {
            return Err(RoosterError::validation(format!(
                "{} is not a day of '{}' ({})",
                outside,
                event.name,
                event.render_span()
            )));
        }

        // Dedupe and sort
        let selected: BTreeSet<NaiveDate> = selected_days.iter().copied().collect();

        Ok(RegistrationRequest {
            event_id: event.id.clone(),
            selected_days: selected.into_iter().collect(),
        })
    }

    pub fn is_multi_day(&self) -> bool {
        !self.selected_days.is_empty()
    }
}
