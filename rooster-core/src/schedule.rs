//! Schedule view state for one event.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::days::expand_days;
use crate::error::{RoosterError, RoosterResult};
use crate::matrix::{HourSlots, RosterMatrix, build_matrix};
use crate::model::Event;
use crate::names::NameDirectory;
use crate::palette::DepartmentPalette;
use crate::repository::Repository;

/// The event's day list, the selected day, and the last successfully built
/// matrix for it.
///
/// Every mutation is followed by [`ScheduleView::reload`]. A failed reload
/// returns the error and leaves the previous matrix on screen.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    event: Event,
    days: Vec<NaiveDate>,
    selected_day: Option<NaiveDate>,
    slots: HourSlots,
    matrix: Option<RosterMatrix>,
    names: NameDirectory,
    palette: DepartmentPalette,
}

impl ScheduleView {
    /// Load the event and build the matrix for its first day.
    pub async fn open(repo: &Repository<'_>, event_id: &str, slots: HourSlots) -> RoosterResult<Self> {
        let event = repo.event(event_id).await?;
        let days = expand_days(&event);

        let mut view = ScheduleView {
            selected_day: days.first().copied(),
            days,
            event,
            slots,
            matrix: None,
            names: NameDirectory::default(),
            palette: DepartmentPalette::default(),
        };
        view.reload(repo).await?;
        Ok(view)
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    /// `None` until the first successful reload, and for events without a
    /// day span.
    pub fn matrix(&self) -> Option<&RosterMatrix> {
        self.matrix.as_ref()
    }

    pub fn names(&self) -> &NameDirectory {
        &self.names
    }

    pub fn palette(&self) -> &DepartmentPalette {
        &self.palette
    }

    /// Switch to `day` and rebuild. On failure the view stays on the
    /// previous day.
    pub async fn select_day(&mut self, repo: &Repository<'_>, day: NaiveDate) -> RoosterResult<()> {
        if !self.days.contains(&day) {
            return Err(RoosterError::validation(format!(
                "{day} is not a day of '{}' ({})",
                self.event.name,
                self.event.render_span()
            )));
        }
        self.rebuild(repo, day).await?;
        self.selected_day = Some(day);
        Ok(())
    }

    /// Re-fetch roster, volunteers and departments and rebuild the matrix.
    pub async fn reload(&mut self, repo: &Repository<'_>) -> RoosterResult<()> {
        let Some(day) = self.selected_day else {
            debug!(event = %self.event.id, "event has no day span; nothing to show");
            self.matrix = None;
            return Ok(());
        };
        self.rebuild(repo, day).await
    }

    /// Nothing in `self` changes unless every fetch succeeds.
    async fn rebuild(&mut self, repo: &Repository<'_>, day: NaiveDate) -> RoosterResult<()> {
        let fetched = async {
            let assignments = repo.assignments().await?;
            let volunteers = repo.volunteers().await?;
            let departments = repo.departments().await?;
            Ok::<_, RoosterError>((assignments, volunteers, departments))
        }
        .await;

        let (assignments, volunteers, departments) = match fetched {
            Ok(data) => data,
            Err(e) => {
                warn!(event = %self.event.id, %day, "roster reload failed, keeping previous grid: {e}");
                return Err(e);
            }
        };

        self.matrix = Some(build_matrix(&assignments, &self.event.id, day, &self.slots));
        self.names = NameDirectory::new(&volunteers, std::slice::from_ref(&self.event));
        self.palette = DepartmentPalette::new(&departments);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssignmentDraft;
    use crate::session::Session;
    use crate::store::{Collection, LocalStore};
    use crate::testing::{EVENT_ID, FlakyStore, Fixture, block_record, record};
    use crate::{account, admin};
    use chrono::{NaiveTime, Utc};
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn hour(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn summer_fair_second_day() {
        let fixture = Fixture::new().await;
        fixture.seed_volunteer("recV", "Anna", "anna@example.org", &[EVENT_ID]).await;
        fixture.seed_departments(&["Bar", "Kassa"]).await;
        // 14:00-18:00 CEST
        fixture
            .seed_blocks(vec![block_record(
                "recA",
                "recV",
                "Bar",
                "2024-08-11T12:00:00.000Z",
                "2024-08-11T16:00:00.000Z",
            )])
            .await;

        let repo = fixture.repo();
        let mut view = ScheduleView::open(&repo, EVENT_ID, HourSlots::default()).await.unwrap();
        assert_eq!(view.days(), [day(10), day(11), day(12)]);
        assert_eq!(view.selected_day(), Some(day(10)));
        assert!(view.matrix().unwrap().is_empty());

        view.select_day(&repo, day(11)).await.unwrap();
        let matrix = view.matrix().unwrap();
        let row = matrix.row("recV").unwrap();
        let active: Vec<u32> = matrix
            .slots
            .times()
            .iter()
            .enumerate()
            .filter(|(i, _)| row.is_active_at(*i))
            .map(|(_, t)| chrono::Timelike::hour(t))
            .collect();
        assert_eq!(active, vec![14, 15, 16, 17]);
        assert_eq!(view.names().volunteer(Some("recV")), "Anna");
        assert_eq!(view.palette().color("Bar"), crate::palette::PALETTE[0]);
    }

    #[tokio::test]
    async fn register_one_day_then_roster_it() {
        let fixture = Fixture::new().await;
        fixture.seed_volunteer("recV", "Anna", "anna@example.org", &[]).await;
        fixture.seed_departments(&["Bar"]).await;
        let repo = fixture.repo();

        let volunteer = account::login(&repo, "anna@example.org", &[]).await.unwrap();
        let updated = account::register_for_event(&repo, &volunteer, EVENT_ID, &[day(11)])
            .await
            .unwrap();
        assert_eq!(updated.registered_event_ids.as_slice(), [EVENT_ID]);

        let coordinator = Session {
            volunteer_id: "recCoord".into(),
            display_name: "Coordinator".into(),
            email: "coordinator@example.org".into(),
            is_admin: true,
            started_at: Utc::now(),
        };
        let draft = AssignmentDraft {
            event_id: EVENT_ID.into(),
            volunteer_id: "recV".into(),
            department: "Bar".into(),
            day: day(11),
            start_time: hour(14),
            end_time: hour(18),
        };
        admin::add_assignment(&repo, &coordinator, &draft).await.unwrap();

        let mut view = ScheduleView::open(&repo, EVENT_ID, HourSlots::default()).await.unwrap();
        view.select_day(&repo, day(11)).await.unwrap();
        let matrix = view.matrix().unwrap();
        for h in [14, 15, 16, 17] {
            assert_eq!(matrix.blocks_at("recV", hour(h)).len(), 1, "{h}:00");
        }
        for h in [13, 18] {
            assert!(matrix.blocks_at("recV", hour(h)).is_empty(), "{h}:00");
        }
    }

    #[tokio::test]
    async fn day_outside_span_is_rejected() {
        let fixture = Fixture::new().await;
        let repo = fixture.repo();
        let mut view = ScheduleView::open(&repo, EVENT_ID, HourSlots::default()).await.unwrap();
        assert!(view.select_day(&repo, day(20)).await.unwrap_err().is_validation());
        assert_eq!(view.selected_day(), Some(day(10)));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_matrix() {
        let fixture = Fixture::new().await;
        fixture
            .seed_blocks(vec![block_record(
                "recA",
                "recV",
                "Bar",
                "2024-08-10T07:00:00.000Z",
                "2024-08-10T09:00:00.000Z",
            )])
            .await;

        let flaky = FlakyStore::new(&fixture.store);
        let repo = Repository::new(&flaky, &fixture.normalizer);
        let mut view = ScheduleView::open(&repo, EVENT_ID, HourSlots::default()).await.unwrap();
        let before = view.matrix().cloned();
        assert!(before.as_ref().is_some_and(|m| m.row("recV").is_some()));

        fixture
            .seed_blocks(vec![block_record(
                "recB",
                "recW",
                "Kassa",
                "2024-08-10T10:00:00.000Z",
                "2024-08-10T11:00:00.000Z",
            )])
            .await;
        flaky.set_failing(true);

        assert!(view.reload(&repo).await.is_err());
        assert_eq!(view.matrix().cloned(), before);

        flaky.set_failing(false);
        view.reload(&repo).await.unwrap();
        assert!(view.matrix().unwrap().row("recW").is_some());
    }

    #[tokio::test]
    async fn failed_day_switch_stays_on_previous_day() {
        let fixture = Fixture::new().await;
        let flaky = FlakyStore::new(&fixture.store);
        let repo = Repository::new(&flaky, &fixture.normalizer);
        let mut view = ScheduleView::open(&repo, EVENT_ID, HourSlots::default()).await.unwrap();

        flaky.set_failing(true);
        assert!(view.select_day(&repo, day(11)).await.is_err());
        assert_eq!(view.selected_day(), Some(day(10)));
        assert_eq!(view.matrix().map(|m| m.day), Some(day(10)));

        flaky.set_failing(false);
        view.select_day(&repo, day(11)).await.unwrap();
        assert_eq!(view.selected_day(), Some(day(11)));
        assert_eq!(view.matrix().map(|m| m.day), Some(day(11)));
    }

    #[tokio::test]
    async fn deleted_volunteer_row_shows_raw_id() {
        let fixture = Fixture::new().await;
        fixture
            .seed_blocks(vec![block_record(
                "recA",
                "recGone",
                "Bar",
                "2024-08-10T07:00:00.000Z",
                "2024-08-10T08:00:00.000Z",
            )])
            .await;

        let repo = fixture.repo();
        let view = ScheduleView::open(&repo, EVENT_ID, HourSlots::default()).await.unwrap();
        let row = &view.matrix().unwrap().rows[0];
        assert_eq!(view.names().volunteer(row.volunteer_id.as_deref()), "recGone");
        assert!(row.is_active_at(view.matrix().unwrap().slot_index(hour(9)).unwrap()));
    }

    #[tokio::test]
    async fn event_without_span_has_no_matrix() {
        let store = LocalStore::in_memory();
        store
            .seed(Collection::Events, vec![record("recX", json!({ "Evenement": "TBD" }))])
            .await
            .unwrap();
        let fixture = Fixture::new().await;
        let repo = Repository::new(&store, &fixture.normalizer);

        let view = ScheduleView::open(&repo, "recX", HourSlots::default()).await.unwrap();
        assert!(view.days().is_empty());
        assert!(view.matrix().is_none());
    }
}
