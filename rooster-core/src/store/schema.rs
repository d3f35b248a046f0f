//! The field-name contract between rooster and the record store.
//!
//! Defaults match the original Airtable base. Every name can be overridden
//! in the `[schema.*]` sections of the config file; there is exactly one
//! name per attribute and it is checked once, at startup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Collection, RecordStore};
use crate::error::{RoosterError, RoosterResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFields {
    pub table: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub location: String,
}

impl Default for EventFields {
    fn default() -> Self {
        EventFields {
            table: "Evenementen".into(),
            name: "Evenement".into(),
            start_date: "Evenement Start datum".into(),
            end_date: "Evenement Eind datum".into(),
            description: "Beschrijving".into(),
            location: "Locatie".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolunteerFields {
    pub table: String,
    /// Computed full name; read-only.
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postcode: String,
    pub city: String,
    pub registered_events: String,
}

impl Default for VolunteerFields {
    fn default() -> Self {
        VolunteerFields {
            table: "Vrijwilligers".into(),
            name: "Naam".into(),
            nickname: "Roepnaam".into(),
            email: "Email Adres".into(),
            phone: "Telefoon nummer".into(),
            address: "Adres".into(),
            postcode: "Postcode".into(),
            city: "Stad".into(),
            registered_events: "Opgegeven Evenementen".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterFields {
    pub table: String,
    pub event: String,
    pub volunteer: String,
    pub department: String,
    pub start: String,
    pub end: String,
    pub notes: String,
}

impl Default for RosterFields {
    fn default() -> Self {
        RosterFields {
            table: "Team Roosters".into(),
            event: "Event Name".into(),
            volunteer: "Volunteer Name".into(),
            department: "Afdeling".into(),
            start: "Start tijd".into(),
            end: "Eind tijd".into(),
            notes: "Notites".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentFields {
    pub table: String,
    pub name: String,
}

impl Default for DepartmentFields {
    fn default() -> Self {
        DepartmentFields {
            table: "Afdelingen".into(),
            name: "Naam".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationFields {
    pub table: String,
    pub volunteer: String,
    pub event: String,
    pub selected_days: String,
    pub registered_on: String,
}

impl Default for RegistrationFields {
    fn default() -> Self {
        RegistrationFields {
            table: "Registrations".into(),
            volunteer: "Volunteer".into(),
            event: "Event".into(),
            selected_days: "Selected Days".into(),
            registered_on: "Registration Date".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub events: EventFields,
    pub volunteers: VolunteerFields,
    pub rosters: RosterFields,
    pub departments: DepartmentFields,
    pub registrations: RegistrationFields,
}

impl Schema {
    /// Store-side table name of a collection.
    pub fn table(&self, collection: Collection) -> &str {
        match collection {
            Collection::Events => &self.events.table,
            Collection::Volunteers => &self.volunteers.table,
            Collection::TeamRosters => &self.rosters.table,
            Collection::Departments => &self.departments.table,
            Collection::Registrations => &self.registrations.table,
        }
    }

    /// Store-side field names mapped for a collection.
    pub fn fields(&self, collection: Collection) -> Vec<&str> {
        match collection {
            Collection::Events => {
                let f = &self.events;
                vec![&f.name, &f.start_date, &f.end_date, &f.description, &f.location]
            }
            Collection::Volunteers => {
                let f = &self.volunteers;
                vec![
                    &f.name,
                    &f.nickname,
                    &f.email,
                    &f.phone,
                    &f.address,
                    &f.postcode,
                    &f.city,
                    &f.registered_events,
                ]
            }
            Collection::TeamRosters => {
                let f = &self.rosters;
                vec![&f.event, &f.volunteer, &f.department, &f.start, &f.end, &f.notes]
            }
            Collection::Departments => vec![&self.departments.name],
            Collection::Registrations => {
                let f = &self.registrations;
                vec![&f.volunteer, &f.event, &f.selected_days, &f.registered_on]
            }
        }
        .into_iter()
        .map(String::as_str)
        .collect()
    }

    /// Checks that need no store: names present and unique per collection.
    pub fn check(&self) -> RoosterResult<()> {
        for collection in Collection::ALL {
            if self.table(collection).trim().is_empty() {
                return Err(RoosterError::Schema(format!(
                    "No table name configured for {collection}"
                )));
            }

            let mut seen = HashSet::new();
            for field in self.fields(collection) {
                if field.trim().is_empty() {
                    return Err(RoosterError::Schema(format!(
                        "Empty field name configured for {collection}"
                    )));
                }
                if !seen.insert(field) {
                    return Err(RoosterError::Schema(format!(
                        "Field '{field}' is mapped twice in {collection}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check the mapping against the live store.
    ///
    /// Every mapped field of the required collections must exist; all missing
    /// fields of a collection are reported together. The registrations log is
    /// best-effort, so problems there are only logged.
    pub async fn validate(&self, store: &dyn RecordStore) -> RoosterResult<()> {
        self.check()?;

        for collection in Collection::ALL {
            let Some(known) = store.field_names(collection).await? else {
                debug!(store = store.name(), %collection, "store cannot introspect, skipping");
                continue;
            };

            let missing: Vec<&str> = self
                .fields(collection)
                .into_iter()
                .filter(|f| !known.iter().any(|k| k == f))
                .collect();

            if missing.is_empty() {
                continue;
            }

            let msg = format!(
                "Table '{}' ({collection}) is missing field(s): {}",
                self.table(collection),
                missing.join(", ")
            );

            if collection == Collection::Registrations {
                warn!("{msg}; per-day registration details will not be recorded");
                continue;
            }

            return Err(RoosterError::Schema(msg));
        }

        Ok(())
    }
}
