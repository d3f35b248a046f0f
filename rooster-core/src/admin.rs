//! Coordinator operations. Every mutation checks the session first.

use chrono::NaiveDateTime;
use tracing::info;

use crate::days::expand_days;
use crate::deletion::DeletionStaging;
use crate::error::{RoosterError, RoosterResult};
use crate::model::{
    AssignmentDraft, AssignmentEdit, Department, Event, EventDraft, RosterAssignment,
    VolunteerProfile,
};
use crate::names::NameDirectory;
use crate::repository::Repository;
use crate::session::Session;

// =============================================================================
// Events
// =============================================================================

pub async fn create_event(repo: &Repository<'_>, session: &Session, draft: &EventDraft) -> RoosterResult<Event> {
    session.require_admin()?;
    let event = repo.create_event(draft).await?;
    info!(id = %event.id, name = %event.name, "event created");
    Ok(event)
}

pub async fn delete_event(repo: &Repository<'_>, session: &Session, event_id: &str) -> RoosterResult<()> {
    session.require_admin()?;
    repo.delete_event(event_id).await?;
    info!(id = %event_id, "event deleted");
    Ok(())
}

// =============================================================================
// Roster
// =============================================================================

/// Put a registered volunteer on the roster.
///
/// The day must fall within the event's span and the department must be one
/// of the configured departments (matched case-insensitively; the stored
/// label uses the department's own spelling).
pub async fn add_assignment(
    repo: &Repository<'_>,
    session: &Session,
    draft: &AssignmentDraft,
) -> RoosterResult<RosterAssignment> {
    session.require_admin()?;
    draft.validate()?;

    let event = repo.event(&draft.event_id).await?;
    let span = expand_days(&event);
    if !span.is_empty() && !span.contains(&draft.day) {
        return Err(RoosterError::validation(format!(
            "{} is not a day of '{}' ({})",
            draft.day,
            event.name,
            event.render_span()
        )));
    }

    let volunteer = repo.volunteer(&draft.volunteer_id).await?;
    if !volunteer.is_registered_for(&event.id) {
        return Err(RoosterError::validation(format!(
            "{} is not registered for '{}'",
            volunteer.display_name(),
            event.name
        )));
    }

    let departments = repo.departments().await?;
    let department = departments
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(draft.department.trim()))
        .ok_or_else(|| {
            RoosterError::validation(format!("Unknown department '{}'", draft.department.trim()))
        })?;

    let draft = AssignmentDraft {
        department: department.name.clone(),
        ..draft.clone()
    };
    repo.create_assignment(&draft).await
}

/// Change department and/or times of a block. The block stays on its day.
pub async fn edit_assignment(
    repo: &Repository<'_>,
    session: &Session,
    assignment_id: &str,
    edit: &AssignmentEdit,
) -> RoosterResult<RosterAssignment> {
    session.require_admin()?;
    if *edit == AssignmentEdit::default() {
        return Err(RoosterError::validation("Nothing to change"));
    }

    let current = repo.assignment(assignment_id).await?;
    let updated = edit.apply(&current)?;
    repo.update_assignment(&updated).await
}

/// Delete the staged blocks. See [`DeletionStaging::confirm_delete`].
pub async fn delete_assignments(
    repo: &Repository<'_>,
    session: &Session,
    staging: &mut DeletionStaging,
) -> RoosterResult<Vec<String>> {
    session.require_admin()?;
    let deleted = staging.confirm_delete(repo).await?;
    info!(count = deleted.len(), "roster blocks deleted");
    Ok(deleted)
}

/// A roster block with its references resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock {
    pub id: String,
    pub event: String,
    pub volunteer: String,
    pub department: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// All blocks (optionally for one event) in start order, with names.
pub async fn resolved_roster(repo: &Repository<'_>, event_id: Option<&str>) -> RoosterResult<Vec<ResolvedBlock>> {
    let assignments = repo.assignments().await?;
    let names = NameDirectory::new(&repo.volunteers().await?, &repo.events().await?);

    Ok(assignments
        .into_iter()
        .filter(|a| event_id.is_none() || a.event_id.as_deref() == event_id)
        .map(|a| ResolvedBlock {
            event: names.event(a.event_id.as_deref()),
            volunteer: names.volunteer(a.volunteer_id.as_deref()),
            id: a.id,
            department: a.department,
            start: a.start,
            end: a.end,
        })
        .collect())
}

// =============================================================================
// Registrations overview
// =============================================================================

#[derive(Debug, Clone)]
pub struct EventRegistrations {
    pub event: Event,
    pub volunteers: Vec<VolunteerProfile>,
}

/// Every event with the volunteers signed up for it, in event order.
pub async fn registrations_by_event(repo: &Repository<'_>) -> RoosterResult<Vec<EventRegistrations>> {
    let events = repo.events().await?;
    let volunteers = repo.volunteers().await?;

    Ok(events
        .into_iter()
        .map(|event| {
            let mut signed_up: Vec<VolunteerProfile> = volunteers
                .iter()
                .filter(|v| v.is_registered_for(&event.id))
                .cloned()
                .collect();
            signed_up.sort_by_key(|v| v.display_name().to_lowercase());
            EventRegistrations {
                event,
                volunteers: signed_up,
            }
        })
        .collect())
}

// =============================================================================
// Departments
// =============================================================================

pub async fn add_department(repo: &Repository<'_>, session: &Session, name: &str) -> RoosterResult<Department> {
    session.require_admin()?;
    let existing = repo.departments().await?;
    if existing.iter().any(|d| d.name.eq_ignore_ascii_case(name.trim())) {
        return Err(RoosterError::validation(format!(
            "Department '{}' already exists",
            name.trim()
        )));
    }
    repo.create_department(name).await
}

/// Rename by id. Existing roster labels keep the old name and fall back to
/// the neutral colour.
pub async fn rename_department(
    repo: &Repository<'_>,
    session: &Session,
    id: &str,
    name: &str,
) -> RoosterResult<Department> {
    session.require_admin()?;
    repo.rename_department(id, name).await
}

pub async fn remove_department(repo: &Repository<'_>, session: &Session, id: &str) -> RoosterResult<()> {
    session.require_admin()?;
    repo.delete_department(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EVENT_ID, Fixture, block_record};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn session(is_admin: bool) -> Session {
        Session {
            volunteer_id: "recCoord".into(),
            display_name: "Coordinator".into(),
            email: "coordinator@example.org".into(),
            is_admin,
            started_at: Utc::now(),
        }
    }

    fn draft(volunteer: &str, department: &str) -> AssignmentDraft {
        AssignmentDraft {
            event_id: EVENT_ID.into(),
            volunteer_id: volunteer.into(),
            department: department.into(),
            day: NaiveDate::from_ymd_opt(2024, 8, 11).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }
    }

    async fn fixture() -> Fixture {
        let fixture = Fixture::new().await;
        fixture.seed_volunteer("recAnna", "Anna", "anna@example.org", &[EVENT_ID]).await;
        fixture.seed_volunteer("recBram", "Bram", "bram@example.org", &[]).await;
        fixture.seed_departments(&["Bar", "Kassa"]).await;
        fixture
    }

    // --- add_assignment ---

    #[tokio::test]
    async fn add_assignment_for_registered_volunteer() {
        let fixture = fixture().await;
        let block = add_assignment(&fixture.repo(), &session(true), &draft("recAnna", "bar"))
            .await
            .unwrap();
        assert_eq!(block.department, "Bar");
        assert_eq!(block.render_interval(), "14:00–18:00");

        let stored = fixture.repo().assignments().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].volunteer_id.as_deref(), Some("recAnna"));
    }

    #[tokio::test]
    async fn unregistered_volunteer_cannot_be_rostered() {
        let fixture = fixture().await;
        let err = add_assignment(&fixture.repo(), &session(true), &draft("recBram", "Bar"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not registered"), "{err}");
        assert!(fixture.repo().assignments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_department_is_rejected() {
        let fixture = fixture().await;
        let err = add_assignment(&fixture.repo(), &session(true), &draft("recAnna", "Keuken"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn non_admin_cannot_add() {
        let fixture = fixture().await;
        let err = add_assignment(&fixture.repo(), &session(false), &draft("recAnna", "Bar"))
            .await
            .unwrap_err();
        assert!(matches!(err, RoosterError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn reversed_interval_is_rejected_before_store_call() {
        let fixture = fixture().await;
        let mut d = draft("recAnna", "Bar");
        d.end_time = d.start_time;
        assert!(add_assignment(&fixture.repo(), &session(true), &d).await.unwrap_err().is_validation());
    }

    // --- edit_assignment ---

    #[tokio::test]
    async fn edit_keeps_day_and_changes_times() {
        let fixture = fixture().await;
        let repo = fixture.repo();
        let block = add_assignment(&repo, &session(true), &draft("recAnna", "Bar")).await.unwrap();

        let edit = AssignmentEdit {
            department: Some("Kassa".into()),
            end_time: NaiveTime::from_hms_opt(20, 0, 0),
            ..Default::default()
        };
        let updated = edit_assignment(&repo, &session(true), &block.id, &edit).await.unwrap();
        assert_eq!(updated.department, "Kassa");
        assert_eq!(updated.render_interval(), "14:00–20:00");
        assert_eq!(updated.day(), block.day());
    }

    // --- resolved_roster ---

    #[tokio::test]
    async fn resolved_roster_uses_fallbacks() {
        let fixture = fixture().await;
        let mut orphan = block_record("recB", "recGone", "Bar", "2024-08-10T08:00:00.000Z", "2024-08-10T09:00:00.000Z");
        orphan.fields.remove("Event Name");
        fixture
            .seed_blocks(vec![
                block_record("recA", "recAnna", "Bar", "2024-08-10T07:00:00.000Z", "2024-08-10T08:00:00.000Z"),
                orphan,
            ])
            .await;

        let all = resolved_roster(&fixture.repo(), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].volunteer, "Anna");
        assert_eq!(all[0].event, "Summer Fair");
        assert_eq!(all[1].volunteer, "recGone");
        assert_eq!(all[1].event, "unknown");

        let fair_only = resolved_roster(&fixture.repo(), Some(EVENT_ID)).await.unwrap();
        assert_eq!(fair_only.len(), 1);
    }

    // --- registrations_by_event ---

    #[tokio::test]
    async fn registrations_overview() {
        let fixture = fixture().await;
        let overview = registrations_by_event(&fixture.repo()).await.unwrap();
        assert_eq!(overview.len(), 1);
        let names: Vec<&str> = overview[0].volunteers.iter().map(|v| v.display_name()).collect();
        assert_eq!(names, vec!["Anna"]);
    }

    // --- departments ---

    #[tokio::test]
    async fn departments_are_sorted_and_unique() {
        let fixture = fixture().await;
        let repo = fixture.repo();

        add_department(&repo, &session(true), "Afwas").await.unwrap();
        assert!(add_department(&repo, &session(true), "kassa").await.unwrap_err().is_validation());

        let names: Vec<String> = repo.departments().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Afwas", "Bar", "Kassa"]);
    }

    #[tokio::test]
    async fn blank_department_name_is_rejected() {
        let fixture = fixture().await;
        let err = rename_department(&fixture.repo(), &session(true), "recD0", "  ")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    // --- events ---

    #[tokio::test]
    async fn create_and_delete_event() {
        let fixture = fixture().await;
        let repo = fixture.repo();
        let draft = EventDraft {
            name: "Winter Market".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 12, 14).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
            description: None,
            location: None,
        };
        let event = create_event(&repo, &session(true), &draft).await.unwrap();
        assert_eq!(expand_days(&event).len(), 2);

        delete_event(&repo, &session(true), &event.id).await.unwrap();
        assert_eq!(repo.events().await.unwrap().len(), 1);
    }
}
