//! Volunteer-facing flows: sign up, log in, profile, event registration.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{RoosterError, RoosterResult};
use crate::model::{DayRegistration, ProfileUpdate, VolunteerProfile};
use crate::registration::RegistrationRequest;
use crate::repository::Repository;
use crate::session::Session;

pub fn is_admin_email(admin_emails: &[String], email: &str) -> bool {
    let email = email.trim();
    admin_emails
        .iter()
        .any(|admin| admin.trim().eq_ignore_ascii_case(email))
}

fn session_for(profile: &VolunteerProfile, email: &str, admin_emails: &[String]) -> Session {
    Session {
        volunteer_id: profile.id.clone(),
        display_name: profile.display_name().to_string(),
        email: email.to_string(),
        is_admin: is_admin_email(admin_emails, email),
        started_at: Utc::now(),
    }
}

fn check_email(email: &str) -> RoosterResult<&str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(RoosterError::validation(format!("'{email}' is not an email address")));
    }
    Ok(email)
}

/// Start a session for the volunteer with `email` (case-insensitive).
pub async fn login(repo: &Repository<'_>, email: &str, admin_emails: &[String]) -> RoosterResult<Session> {
    let email = check_email(email)?;
    let profile = repo
        .volunteer_by_email(email)
        .await?
        .ok_or_else(|| RoosterError::validation(format!("No volunteer found with email {email}")))?;

    let stored_email = profile.email.clone().unwrap_or_else(|| email.to_string());
    info!(volunteer = %profile.id, "logged in");
    Ok(session_for(&profile, &stored_email, admin_emails))
}

/// Create a volunteer record and log it in.
pub async fn signup(
    repo: &Repository<'_>,
    email: &str,
    profile: ProfileUpdate,
    admin_emails: &[String],
) -> RoosterResult<Session> {
    let email = check_email(email)?;
    if repo.volunteer_by_email(email).await?.is_some() {
        return Err(RoosterError::validation(format!(
            "An account with email {email} already exists. Log in instead."
        )));
    }

    let update = ProfileUpdate {
        email: Some(email.to_string()),
        ..profile
    };
    let created = repo.create_volunteer(&update).await?;
    info!(volunteer = %created.id, "signed up");
    Ok(session_for(&created, email, admin_emails))
}

pub async fn profile(repo: &Repository<'_>, session: &Session) -> RoosterResult<VolunteerProfile> {
    repo.volunteer(&session.volunteer_id).await
}

/// Write the set attributes of `update` to the logged-in volunteer.
pub async fn update_profile(
    repo: &Repository<'_>,
    session: &Session,
    update: &ProfileUpdate,
) -> RoosterResult<VolunteerProfile> {
    if update.is_empty() {
        return Err(RoosterError::validation("Nothing to update"));
    }

    if let Some(email) = &update.email {
        let email = check_email(email)?;
        let taken = repo
            .volunteer_by_email(email)
            .await?
            .is_some_and(|other| other.id != session.volunteer_id);
        if taken {
            return Err(RoosterError::validation(format!(
                "Email {email} is already used by another volunteer"
            )));
        }
    }

    repo.update_profile(&session.volunteer_id, update).await
}

/// Sign the logged-in volunteer up for an event.
///
/// The event id in the volunteer's registration set is what counts. For
/// multi-day events the selected days are also appended to the registrations
/// log, best-effort.
pub async fn register_for_event(
    repo: &Repository<'_>,
    session: &Session,
    event_id: &str,
    selected_days: &[chrono::NaiveDate],
) -> RoosterResult<VolunteerProfile> {
    let event = repo.event(event_id).await?;
    let request = RegistrationRequest::new(&event, selected_days)?;

    let volunteer = repo.volunteer(&session.volunteer_id).await?;
    let registrations = volunteer.registered_event_ids.register(&request.event_id);
    let updated = repo.set_registrations(&volunteer.id, &registrations).await?;
    debug!(volunteer = %volunteer.id, event = %event.id, "registered");

    if request.is_multi_day() {
        let today = Utc::now()
            .with_timezone(&repo.normalizer().timezone())
            .date_naive();
        repo.log_day_registration(&DayRegistration {
            volunteer_id: volunteer.id.clone(),
            event_id: request.event_id.clone(),
            selected_days: request.selected_days,
            registered_on: today,
        })
        .await;
    }

    Ok(updated)
}

pub async fn unregister_from_event(
    repo: &Repository<'_>,
    session: &Session,
    event_id: &str,
) -> RoosterResult<VolunteerProfile> {
    let volunteer = repo.volunteer(&session.volunteer_id).await?;
    if !volunteer.is_registered_for(event_id) {
        return Ok(volunteer);
    }
    let registrations = volunteer.registered_event_ids.unregister(event_id);
    repo.set_registrations(&volunteer.id, &registrations).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, ListQuery, RecordStore};
    use crate::testing::{EVENT_ID, Fixture, record};
    use chrono::NaiveDate;
    use serde_json::json;

    fn admins() -> Vec<String> {
        vec!["Coordinator@Example.org".to_string()]
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    async fn logged_in(fixture: &Fixture) -> Session {
        fixture
            .seed_volunteer("recAnna", "Anna", "anna@example.org", &[])
            .await;
        login(&fixture.repo(), "anna@example.org", &admins()).await.unwrap()
    }

    // --- login ---

    #[tokio::test]
    async fn login_ignores_email_case() {
        let fixture = Fixture::new().await;
        fixture
            .seed_volunteer("recC", "Coco", "coordinator@example.org", &[])
            .await;

        let session = login(&fixture.repo(), "  COORDINATOR@example.ORG ", &admins())
            .await
            .unwrap();
        assert_eq!(session.volunteer_id, "recC");
        assert_eq!(session.display_name, "Coco");
        assert!(session.is_admin);
    }

    #[tokio::test]
    async fn non_admin_login() {
        let fixture = Fixture::new().await;
        let session = logged_in(&fixture).await;
        assert!(!session.is_admin);
        assert!(session.require_admin().is_err());
    }

    #[tokio::test]
    async fn unknown_email_is_rejected() {
        let fixture = Fixture::new().await;
        let err = login(&fixture.repo(), "ghost@example.org", &admins())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    // --- signup ---

    #[tokio::test]
    async fn signup_creates_and_logs_in() {
        let fixture = Fixture::new().await;
        let profile = ProfileUpdate {
            nickname: Some("Bram".into()),
            ..Default::default()
        };
        let session = signup(&fixture.repo(), "bram@example.org", profile, &admins())
            .await
            .unwrap();
        assert_eq!(session.display_name, "Bram");

        let stored = fixture.repo().volunteer(&session.volunteer_id).await.unwrap();
        assert_eq!(stored.email.as_deref(), Some("bram@example.org"));
    }

    #[tokio::test]
    async fn signup_with_existing_email_fails() {
        let fixture = Fixture::new().await;
        fixture
            .seed_volunteer("recAnna", "Anna", "anna@example.org", &[])
            .await;
        let err = signup(&fixture.repo(), "ANNA@example.org", ProfileUpdate::default(), &admins())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    // --- update_profile ---

    #[tokio::test]
    async fn update_profile_writes_only_set_fields() {
        let fixture = Fixture::new().await;
        let session = logged_in(&fixture).await;

        let update = ProfileUpdate {
            city: Some("Utrecht".into()),
            ..Default::default()
        };
        let updated = update_profile(&fixture.repo(), &session, &update).await.unwrap();
        assert_eq!(updated.city.as_deref(), Some("Utrecht"));
        assert_eq!(updated.nickname.as_deref(), Some("Anna"));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let fixture = Fixture::new().await;
        let session = logged_in(&fixture).await;
        let err = update_profile(&fixture.repo(), &session, &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    // --- register_for_event ---

    #[tokio::test]
    async fn multi_day_registration_records_event_and_days() {
        let fixture = Fixture::new().await;
        let session = logged_in(&fixture).await;

        let updated = register_for_event(&fixture.repo(), &session, EVENT_ID, &[day(12), day(11)])
            .await
            .unwrap();
        assert!(updated.is_registered_for(EVENT_ID));

        let log = fixture
            .store
            .list(Collection::Registrations, &ListQuery::all())
            .await
            .unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].fields["Selected Days"], json!("2024-08-11, 2024-08-12"));
        assert_eq!(log[0].fields["Event"], json!([EVENT_ID]));
    }

    #[tokio::test]
    async fn multi_day_registration_needs_a_day() {
        let fixture = Fixture::new().await;
        let session = logged_in(&fixture).await;

        let err = register_for_event(&fixture.repo(), &session, EVENT_ID, &[])
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let volunteer = fixture.repo().volunteer("recAnna").await.unwrap();
        assert!(!volunteer.is_registered_for(EVENT_ID));
    }

    #[tokio::test]
    async fn single_day_registration_skips_day_log() {
        let fixture = Fixture::new().await;
        fixture
            .seed(
                Collection::Events,
                vec![record(
                    "recOne",
                    json!({
                        "Evenement": "Clean-up",
                        "Evenement Start datum": "2024-09-01",
                        "Evenement Eind datum": "2024-09-01",
                    }),
                )],
            )
            .await;
        let session = logged_in(&fixture).await;

        register_for_event(&fixture.repo(), &session, "recOne", &[day(1)])
            .await
            .unwrap();
        let log = fixture
            .store
            .list(Collection::Registrations, &ListQuery::all())
            .await
            .unwrap();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn registering_twice_keeps_one_entry_and_unregister_removes_it() {
        let fixture = Fixture::new().await;
        let session = logged_in(&fixture).await;
        let repo = fixture.repo();

        register_for_event(&repo, &session, EVENT_ID, &[day(10)]).await.unwrap();
        let again = register_for_event(&repo, &session, EVENT_ID, &[day(10)]).await.unwrap();
        assert_eq!(again.registered_event_ids.len(), 1);

        let after = unregister_from_event(&repo, &session, EVENT_ID).await.unwrap();
        assert!(after.registered_event_ids.is_empty());
    }
}
