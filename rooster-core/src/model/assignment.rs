//! Roster assignments ("blocks"): one volunteer, one department, one interval.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{RoosterError, RoosterResult};

/// Timestamps are wall-clock times in the organisation's timezone. The store
/// boundary converts them from whatever the store keeps (UTC for Airtable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterAssignment {
    pub id: String,
    pub event_id: Option<String>,
    pub volunteer_id: Option<String>,
    pub department: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl RosterAssignment {
    /// Date portion of the start timestamp.
    pub fn day(&self) -> Option<NaiveDate> {
        self.start.map(|s| s.date())
    }

    /// Half-open interval test: `start <= instant < end`.
    pub fn is_active_at(&self, instant: NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => instant >= start && instant < end,
            _ => false,
        }
    }

    /// Whether the block shows in the hour starting at `slot`: it covers the
    /// slot instant, or it starts before the next slot. Equivalent to the
    /// block overlapping `[slot, slot + 1h)`.
    pub fn occupies_hour(&self, slot: NaiveDateTime) -> bool {
        let starts_within = match (self.start, self.end) {
            (Some(s), Some(e)) => s < e && s >= slot && s < slot + TimeDelta::hours(1),
            _ => false,
        };
        self.is_active_at(slot) || starts_within
    }

    /// "14:00–18:00", or "?" for a block missing either bound.
    pub fn render_interval(&self) -> String {
        match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{}–{}", s.format("%H:%M"), e.format("%H:%M")),
            _ => "?".to_string(),
        }
    }
}

/// A new block as entered by an admin.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentDraft {
    pub event_id: String,
    pub volunteer_id: String,
    pub department: String,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AssignmentDraft {
    pub fn start(&self) -> NaiveDateTime {
        self.day.and_time(self.start_time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.day.and_time(self.end_time)
    }

    pub fn validate(&self) -> RoosterResult<()> {
        if self.event_id.trim().is_empty()
            || self.volunteer_id.trim().is_empty()
            || self.department.trim().is_empty()
        {
            return Err(RoosterError::validation(
                "Event, volunteer and department are all required",
            ));
        }
        validate_interval(self.start(), self.end())
    }
}

/// Changes to an existing block. `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignmentEdit {
    pub department: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl AssignmentEdit {
    /// Apply to `current`, keeping the block on its original day.
    pub fn apply(&self, current: &RosterAssignment) -> RoosterResult<RosterAssignment> {
        let day = current
            .day()
            .ok_or_else(|| RoosterError::validation("Block has no start time to edit"))?;

        let start = match self.start_time {
            Some(t) => Some(day.and_time(t)),
            None => current.start,
        };
        let end = match self.end_time {
            Some(t) => Some(day.and_time(t)),
            None => current.end,
        };

        if let (Some(s), Some(e)) = (start, end) {
            validate_interval(s, e)?;
        }

        let department = match &self.department {
            Some(d) if d.trim().is_empty() => {
                return Err(RoosterError::validation("Department cannot be blank"));
            }
            Some(d) => d.clone(),
            None => current.department.clone(),
        };

        Ok(RosterAssignment {
            department,
            start,
            end,
            ..current.clone()
        })
    }
}

fn validate_interval(start: NaiveDateTime, end: NaiveDateTime) -> RoosterResult<()> {
    if start >= end {
        return Err(RoosterError::validation(format!(
            "End time {} must be after start time {}",
            end.format("%H:%M"),
            start.format("%H:%M")
        )));
    }
    Ok(())
}
