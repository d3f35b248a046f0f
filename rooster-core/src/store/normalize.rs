//! Raw store records <-> typed model.
//!
//! Reading is lenient: a missing or unparsable value becomes `None` instead
//! of failing the whole listing, so stale or hand-edited rows still show up.
//! Writing is strict and always uses the single configured field name.

use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;
use serde_json::{Value, json};

use super::{Fields, Record, Schema};
use crate::error::{RoosterError, RoosterResult};
use crate::model::{
    AssignmentDraft, DayRegistration, Department, Event, EventDraft, ProfileUpdate,
    RosterAssignment, VolunteerProfile,
};
use crate::registration::RegistrationSet;

const ROSTER_NOTE: &str = "Created with rooster";

#[derive(Debug, Clone)]
pub struct Normalizer {
    schema: Schema,
    tz: Tz,
}

impl Normalizer {
    pub fn new(schema: Schema, tz: Tz) -> Self {
        Normalizer { schema, tz }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn event(&self, record: &Record) -> Event {
        let f = &self.schema.events;
        Event {
            id: record.id.clone(),
            name: text(&record.fields, &f.name).unwrap_or_default(),
            start_date: date(&record.fields, &f.start_date),
            end_date: date(&record.fields, &f.end_date),
            description: text(&record.fields, &f.description),
            location: text(&record.fields, &f.location),
        }
    }

    pub fn event_fields(&self, draft: &EventDraft) -> Fields {
        let f = &self.schema.events;
        let mut fields = Fields::new();
        fields.insert(f.name.clone(), json!(draft.name.trim()));
        fields.insert(f.start_date.clone(), json!(format_date(draft.start_date)));
        fields.insert(f.end_date.clone(), json!(format_date(draft.end_date)));
        if let Some(d) = &draft.description {
            fields.insert(f.description.clone(), json!(d));
        }
        if let Some(l) = &draft.location {
            fields.insert(f.location.clone(), json!(l));
        }
        fields
    }

    // =========================================================================
    // Volunteers
    // =========================================================================

    pub fn volunteer(&self, record: &Record) -> VolunteerProfile {
        let f = &self.schema.volunteers;
        VolunteerProfile {
            id: record.id.clone(),
            name: text(&record.fields, &f.name),
            nickname: text(&record.fields, &f.nickname),
            email: text(&record.fields, &f.email),
            phone: text(&record.fields, &f.phone),
            address: text(&record.fields, &f.address),
            postcode: text(&record.fields, &f.postcode),
            city: text(&record.fields, &f.city),
            registered_event_ids: links(&record.fields, &f.registered_events).into(),
        }
    }

    /// Only the attributes set in `update`; the computed name is never written.
    pub fn profile_fields(&self, update: &ProfileUpdate) -> Fields {
        let f = &self.schema.volunteers;
        let mut fields = Fields::new();
        let pairs = [
            (&f.nickname, &update.nickname),
            (&f.email, &update.email),
            (&f.phone, &update.phone),
            (&f.address, &update.address),
            (&f.postcode, &update.postcode),
            (&f.city, &update.city),
        ];
        for (key, value) in pairs {
            if let Some(v) = value {
                fields.insert(key.clone(), json!(v.trim()));
            }
        }
        fields
    }

    pub fn registrations_fields(&self, registrations: &RegistrationSet) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            self.schema.volunteers.registered_events.clone(),
            json!(registrations.as_slice()),
        );
        fields
    }

    // =========================================================================
    // Roster assignments
    // =========================================================================

    pub fn assignment(&self, record: &Record) -> RosterAssignment {
        let f = &self.schema.rosters;
        RosterAssignment {
            id: record.id.clone(),
            event_id: link(&record.fields, &f.event),
            volunteer_id: link(&record.fields, &f.volunteer),
            department: text(&record.fields, &f.department).unwrap_or_default(),
            start: self.timestamp(&record.fields, &f.start),
            end: self.timestamp(&record.fields, &f.end),
        }
    }

    pub fn assignment_fields(&self, draft: &AssignmentDraft) -> RoosterResult<Fields> {
        let f = &self.schema.rosters;
        let mut fields = Fields::new();
        fields.insert(f.event.clone(), json!([draft.event_id]));
        fields.insert(f.volunteer.clone(), json!([draft.volunteer_id]));
        fields.insert(f.department.clone(), json!([draft.department]));
        fields.insert(f.start.clone(), json!(self.format_timestamp(draft.start())?));
        fields.insert(f.end.clone(), json!(self.format_timestamp(draft.end())?));
        fields.insert(f.notes.clone(), json!(ROSTER_NOTE));
        Ok(fields)
    }

    /// Department and interval of an edited block.
    pub fn assignment_edit_fields(&self, block: &RosterAssignment) -> RoosterResult<Fields> {
        let f = &self.schema.rosters;
        let mut fields = Fields::new();
        fields.insert(f.department.clone(), json!([block.department]));
        if let Some(start) = block.start {
            fields.insert(f.start.clone(), json!(self.format_timestamp(start)?));
        }
        if let Some(end) = block.end {
            fields.insert(f.end.clone(), json!(self.format_timestamp(end)?));
        }
        Ok(fields)
    }

    // =========================================================================
    // Departments & registration log
    // =========================================================================

    pub fn department(&self, record: &Record) -> Department {
        Department {
            id: record.id.clone(),
            name: text(&record.fields, &self.schema.departments.name).unwrap_or_default(),
        }
    }

    pub fn department_fields(&self, name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(self.schema.departments.name.clone(), json!(name.trim()));
        fields
    }

    pub fn day_registration_fields(&self, reg: &DayRegistration) -> Fields {
        let f = &self.schema.registrations;
        let days: Vec<String> = reg.selected_days.iter().map(|d| format_date(*d)).collect();
        let mut fields = Fields::new();
        fields.insert(f.volunteer.clone(), json!([reg.volunteer_id]));
        fields.insert(f.event.clone(), json!([reg.event_id]));
        fields.insert(f.selected_days.clone(), json!(days.join(", ")));
        fields.insert(f.registered_on.clone(), json!(format_date(reg.registered_on)));
        fields
    }

    // =========================================================================
    // Timestamps
    // =========================================================================

    /// RFC 3339 instants are converted to wall-clock time in the configured
    /// timezone. Values without an offset are taken as wall-clock already.
    fn timestamp(&self, fields: &Fields, key: &str) -> Option<NaiveDateTime> {
        let raw = fields.get(key)?.as_str()?.trim();

        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    /// Wall-clock time -> UTC RFC 3339 with millisecond precision.
    pub fn format_timestamp(&self, local: NaiveDateTime) -> RoosterResult<String> {
        let zoned = self.tz.from_local_datetime(&local).earliest().ok_or_else(|| {
            RoosterError::validation(format!(
                "{} does not exist in timezone {}",
                local.format("%Y-%m-%d %H:%M"),
                self.tz
            ))
        })?;
        Ok(zoned
            .with_timezone(&chrono::Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// String, number, or a list of strings (joined with ", ").
fn text(fields: &Fields, key: &str) -> Option<String> {
    let s = match fields.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Linked-record fields are lists of ids; the first one is the reference.
fn link(fields: &Fields, key: &str) -> Option<String> {
    links(fields, key).into_iter().next()
}

fn links(fields: &Fields, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Date-only value; any time portion is truncated.
fn date(fields: &Fields, key: &str) -> Option<NaiveDate> {
    let raw = fields.get(key)?.as_str()?.trim();
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}
