//! Resolving record ids to display names.

use std::collections::HashMap;

use crate::constants::UNKNOWN_LABEL;
use crate::model::{Event, VolunteerProfile};

/// Lookup from ids to names. Missing references never hide a row: an id
/// that resolves to nothing is shown as-is, an absent id as "unknown".
#[derive(Debug, Clone, Default)]
pub struct NameDirectory {
    volunteers: HashMap<String, String>,
    events: HashMap<String, String>,
}

impl NameDirectory {
    pub fn new(volunteers: &[VolunteerProfile], events: &[Event]) -> Self {
        NameDirectory {
            volunteers: volunteers
                .iter()
                .map(|v| (v.id.clone(), v.display_name().to_string()))
                .collect(),
            events: events
                .iter()
                .filter(|e| !e.name.trim().is_empty())
                .map(|e| (e.id.clone(), e.name.clone()))
                .collect(),
        }
    }

    pub fn volunteer(&self, id: Option<&str>) -> String {
        resolve(&self.volunteers, id)
    }

    pub fn event(&self, id: Option<&str>) -> String {
        resolve(&self.events, id)
    }
}

fn resolve(names: &HashMap<String, String>, id: Option<&str>) -> String {
    match id {
        Some(id) => names.get(id).cloned().unwrap_or_else(|| id.to_string()),
        None => UNKNOWN_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks() {
        let anna = VolunteerProfile {
            id: "recAnna".into(),
            nickname: Some("Anna".into()),
            ..Default::default()
        };
        let names = NameDirectory::new(&[anna], &[]);

        assert_eq!(names.volunteer(Some("recAnna")), "Anna");
        assert_eq!(names.volunteer(Some("recDeleted")), "recDeleted");
        assert_eq!(names.volunteer(None), "unknown");
        assert_eq!(names.event(Some("recE")), "recE");
    }
}
