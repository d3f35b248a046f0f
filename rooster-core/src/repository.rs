//! Typed access to the record store.

use tracing::{debug, warn};

use crate::error::{RoosterError, RoosterResult};
use crate::model::{
    AssignmentDraft, DayRegistration, Department, Event, EventDraft, ProfileUpdate,
    RosterAssignment, VolunteerProfile,
};
use crate::registration::RegistrationSet;
use crate::store::{Collection, DeleteOutcome, Filter, ListQuery, Normalizer, RecordStore};

/// Store + field mapping. Cheap to construct; borrow the store for one
/// command or one view.
pub struct Repository<'a> {
    store: &'a dyn RecordStore,
    normalizer: &'a Normalizer,
}

impl<'a> Repository<'a> {
    pub fn new(store: &'a dyn RecordStore, normalizer: &'a Normalizer) -> Self {
        Repository { store, normalizer }
    }

    pub fn store(&self) -> &'a dyn RecordStore {
        self.store
    }

    pub fn normalizer(&self) -> &'a Normalizer {
        self.normalizer
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// All events, ordered by start date (undated events first).
    pub async fn events(&self) -> RoosterResult<Vec<Event>> {
        let f = &self.normalizer.schema().events;
        let query = ListQuery::all().sort_by(&f.start_date);
        let records = self.store.list(Collection::Events, &query).await?;
        Ok(records.iter().map(|r| self.normalizer.event(r)).collect())
    }

    pub async fn event(&self, id: &str) -> RoosterResult<Event> {
        let record = self.require(Collection::Events, id).await?;
        Ok(self.normalizer.event(&record))
    }

    pub async fn create_event(&self, draft: &EventDraft) -> RoosterResult<Event> {
        draft.validate()?;
        let record = self
            .store
            .create(Collection::Events, self.normalizer.event_fields(draft))
            .await?;
        debug!(id = %record.id, "created event");
        Ok(self.normalizer.event(&record))
    }

    pub async fn delete_event(&self, id: &str) -> RoosterResult<()> {
        self.store
            .delete(Collection::Events, &[id.to_string()])
            .await?
            .into_result()?;
        Ok(())
    }

    // =========================================================================
    // Volunteers
    // =========================================================================

    pub async fn volunteers(&self) -> RoosterResult<Vec<VolunteerProfile>> {
        let records = self.store.list(Collection::Volunteers, &ListQuery::all()).await?;
        Ok(records.iter().map(|r| self.normalizer.volunteer(r)).collect())
    }

    pub async fn volunteer(&self, id: &str) -> RoosterResult<VolunteerProfile> {
        let record = self.require(Collection::Volunteers, id).await?;
        Ok(self.normalizer.volunteer(&record))
    }

    /// Case-insensitive lookup on the email field.
    pub async fn volunteer_by_email(&self, email: &str) -> RoosterResult<Option<VolunteerProfile>> {
        let query = ListQuery::all()
            .filter(Filter::FieldEquals {
                field: self.normalizer.schema().volunteers.email.clone(),
                value: email.trim().to_string(),
                ignore_case: true,
            })
            .limit(1);
        let records = self.store.list(Collection::Volunteers, &query).await?;
        Ok(records.first().map(|r| self.normalizer.volunteer(r)))
    }

    pub async fn create_volunteer(&self, profile: &ProfileUpdate) -> RoosterResult<VolunteerProfile> {
        let record = self
            .store
            .create(Collection::Volunteers, self.normalizer.profile_fields(profile))
            .await?;
        Ok(self.normalizer.volunteer(&record))
    }

    pub async fn update_profile(
        &self,
        volunteer_id: &str,
        update: &ProfileUpdate,
    ) -> RoosterResult<VolunteerProfile> {
        let record = self
            .store
            .update(Collection::Volunteers, volunteer_id, self.normalizer.profile_fields(update))
            .await?;
        Ok(self.normalizer.volunteer(&record))
    }

    pub async fn set_registrations(
        &self,
        volunteer_id: &str,
        registrations: &RegistrationSet,
    ) -> RoosterResult<VolunteerProfile> {
        let record = self
            .store
            .update(
                Collection::Volunteers,
                volunteer_id,
                self.normalizer.registrations_fields(registrations),
            )
            .await?;
        Ok(self.normalizer.volunteer(&record))
    }

    /// Append to the per-day registration log. Failures are logged and
    /// swallowed: the event-level registration is what counts.
    pub async fn log_day_registration(&self, registration: &DayRegistration) {
        let fields = self.normalizer.day_registration_fields(registration);
        if let Err(e) = self.store.create(Collection::Registrations, fields).await {
            warn!(
                volunteer = %registration.volunteer_id,
                event = %registration.event_id,
                "could not record selected days: {e}"
            );
        }
    }

    // =========================================================================
    // Roster assignments
    // =========================================================================

    /// All blocks, ordered by start time.
    pub async fn assignments(&self) -> RoosterResult<Vec<RosterAssignment>> {
        let f = &self.normalizer.schema().rosters;
        let query = ListQuery::all().sort_by(&f.start);
        let records = self.store.list(Collection::TeamRosters, &query).await?;
        Ok(records.iter().map(|r| self.normalizer.assignment(r)).collect())
    }

    pub async fn assignment(&self, id: &str) -> RoosterResult<RosterAssignment> {
        let record = self.require(Collection::TeamRosters, id).await?;
        Ok(self.normalizer.assignment(&record))
    }

    pub async fn create_assignment(&self, draft: &AssignmentDraft) -> RoosterResult<RosterAssignment> {
        draft.validate()?;
        let fields = self.normalizer.assignment_fields(draft)?;
        let record = self.store.create(Collection::TeamRosters, fields).await?;
        debug!(id = %record.id, volunteer = %draft.volunteer_id, "created roster block");
        Ok(self.normalizer.assignment(&record))
    }

    pub async fn update_assignment(&self, block: &RosterAssignment) -> RoosterResult<RosterAssignment> {
        let fields = self.normalizer.assignment_edit_fields(block)?;
        let record = self
            .store
            .update(Collection::TeamRosters, &block.id, fields)
            .await?;
        Ok(self.normalizer.assignment(&record))
    }

    pub async fn delete_assignments(&self, ids: &[String]) -> RoosterResult<DeleteOutcome> {
        self.store.delete(Collection::TeamRosters, ids).await
    }

    // =========================================================================
    // Departments
    // =========================================================================

    /// Ordered by name. This order drives department colours.
    pub async fn departments(&self) -> RoosterResult<Vec<Department>> {
        let f = &self.normalizer.schema().departments;
        let query = ListQuery::all().sort_by(&f.name);
        let records = self.store.list(Collection::Departments, &query).await?;
        Ok(records.iter().map(|r| self.normalizer.department(r)).collect())
    }

    pub async fn create_department(&self, name: &str) -> RoosterResult<Department> {
        let name = non_blank_department(name)?;
        let record = self
            .store
            .create(Collection::Departments, self.normalizer.department_fields(name))
            .await?;
        Ok(self.normalizer.department(&record))
    }

    pub async fn rename_department(&self, id: &str, name: &str) -> RoosterResult<Department> {
        let name = non_blank_department(name)?;
        let record = self
            .store
            .update(Collection::Departments, id, self.normalizer.department_fields(name))
            .await?;
        Ok(self.normalizer.department(&record))
    }

    pub async fn delete_department(&self, id: &str) -> RoosterResult<()> {
        self.store
            .delete(Collection::Departments, &[id.to_string()])
            .await?
            .into_result()?;
        Ok(())
    }

    async fn require(&self, collection: Collection, id: &str) -> RoosterResult<crate::store::Record> {
        self.store
            .get(collection, id)
            .await?
            .ok_or_else(|| RoosterError::NotFound {
                collection,
                id: id.to_string(),
            })
    }
}

fn non_blank_department(name: &str) -> RoosterResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RoosterError::validation("Department name cannot be blank"));
    }
    Ok(name)
}
