//! Volunteer profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registration::RegistrationSet;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolunteerProfile {
    pub id: String,
    /// Computed by the store (first + last name); never written back.
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub registered_event_ids: RegistrationSet,
}

impl VolunteerProfile {
    /// Nickname, then full name, then the raw record id.
    pub fn display_name(&self) -> &str {
        non_blank(self.nickname.as_deref())
            .or_else(|| non_blank(self.name.as_deref()))
            .unwrap_or(&self.id)
    }

    pub fn is_registered_for(&self, event_id: &str) -> bool {
        self.registered_event_ids.contains(event_id)
    }
}

impl fmt::Display for VolunteerProfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Editable profile attributes. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}
