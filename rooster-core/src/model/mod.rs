//! Typed records. Everything past the store boundary works with these.

mod assignment;
mod event;
mod volunteer;

pub use assignment::{AssignmentDraft, AssignmentEdit, RosterAssignment};
pub use event::{Event, EventDraft};
pub use volunteer::{ProfileUpdate, VolunteerProfile};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
}

/// Per-day detail of a multi-day registration. Written best-effort and never
/// read back as the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRegistration {
    pub volunteer_id: String,
    pub event_id: String,
    pub selected_days: Vec<NaiveDate>,
    pub registered_on: NaiveDate,
}
