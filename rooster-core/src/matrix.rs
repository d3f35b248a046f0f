//! Volunteer × hour-slot grid for one event day.

use chrono::{NaiveDate, NaiveTime};

use crate::constants::{DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR};
use crate::error::{RoosterError, RoosterResult};
use crate::model::RosterAssignment;

/// Ordered hour markers of the display window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlots(Vec<NaiveTime>);

impl Default for HourSlots {
    /// 07:00 through 22:00, one slot per hour (16 slots).
    fn default() -> Self {
        // Constants are valid hours, so this never fails.
        HourSlots::new(DEFAULT_DAY_START_HOUR, DEFAULT_DAY_END_HOUR)
            .unwrap_or_else(|_| HourSlots(Vec::new()))
    }
}

impl HourSlots {
    /// One slot per hour from `start_hour` to `end_hour`, both inclusive.
    pub fn new(start_hour: u32, end_hour: u32) -> RoosterResult<Self> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(RoosterError::Config(format!(
                "Invalid display window {start_hour}:00–{end_hour}:00"
            )));
        }
        Ok(HourSlots(
            (start_hour..=end_hour)
                .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
                .collect(),
        ))
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One volunteer's line in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    /// `None` collects blocks whose volunteer reference is missing.
    pub volunteer_id: Option<String>,
    /// All of this volunteer's blocks on the day, in input order.
    pub blocks: Vec<RosterAssignment>,
    /// `cells[i]` holds indices into `blocks` active at slot `i`.
    cells: Vec<Vec<usize>>,
}

impl MatrixRow {
    /// Blocks active at slot index `i`. Overlapping blocks each appear.
    pub fn blocks_at(&self, i: usize) -> Vec<&RosterAssignment> {
        self.cells
            .get(i)
            .map(|idx| idx.iter().map(|&b| &self.blocks[b]).collect())
            .unwrap_or_default()
    }

    pub fn is_active_at(&self, i: usize) -> bool {
        self.cells.get(i).is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterMatrix {
    pub event_id: String,
    pub day: NaiveDate,
    pub slots: HourSlots,
    /// Ordered by each volunteer's first appearance in the input.
    pub rows: Vec<MatrixRow>,
}

impl RosterMatrix {
    pub fn row(&self, volunteer_id: &str) -> Option<&MatrixRow> {
        self.rows
            .iter()
            .find(|r| r.volunteer_id.as_deref() == Some(volunteer_id))
    }

    /// Slot index for a clock time, if it is in the window.
    pub fn slot_index(&self, slot: NaiveTime) -> Option<usize> {
        self.slots.times().iter().position(|t| *t == slot)
    }

    /// Blocks for `volunteer_id` active at `slot`.
    pub fn blocks_at(&self, volunteer_id: &str, slot: NaiveTime) -> Vec<&RosterAssignment> {
        match (self.row(volunteer_id), self.slot_index(slot)) {
            (Some(row), Some(i)) => row.blocks_at(i),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the grid for `event_id` on `day`.
///
/// Assignments for other events or other days are ignored. Blocks without a
/// volunteer reference share one row keyed `None`. A block is active at a slot when
/// `start <= day+slot < end`, or when it starts inside that slot's hour, so a
/// 09:15–10:00 block shows at 09:00 but a block ending at 10:00 does not
/// show at 10:00.
pub fn build_matrix(
    assignments: &[RosterAssignment],
    event_id: &str,
    day: NaiveDate,
    slots: &HourSlots,
) -> RosterMatrix {
    let mut rows: Vec<MatrixRow> = Vec::new();

    let for_day = assignments
        .iter()
        .filter(|a| a.event_id.as_deref() == Some(event_id) && a.day() == Some(day));

    for assignment in for_day {
        let row = match rows.iter().position(|r| r.volunteer_id == assignment.volunteer_id) {
            Some(i) => &mut rows[i],
            None => {
                rows.push(MatrixRow {
                    volunteer_id: assignment.volunteer_id.clone(),
                    blocks: Vec::new(),
                    cells: vec![Vec::new(); slots.len()],
                });
                let last = rows.len() - 1;
                &mut rows[last]
            }
        };

        let block_index = row.blocks.len();
        for (i, slot) in slots.times().iter().enumerate() {
            if assignment.occupies_hour(day.and_time(*slot)) {
                row.cells[i].push(block_index);
            }
        }
        row.blocks.push(assignment.clone());
    }

    RosterMatrix {
        event_id: event_id.to_string(),
        day,
        slots: slots.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hm(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn block(id: &str, volunteer: &str, dept: &str, day: &str, from: &str, to: &str) -> RosterAssignment {
        let at = |t: &str| {
            NaiveDateTime::parse_from_str(&format!("{day} {t}"), "%Y-%m-%d %H:%M").unwrap()
        };
        RosterAssignment {
            id: id.into(),
            event_id: Some("recFair".into()),
            volunteer_id: Some(volunteer.into()),
            department: dept.into(),
            start: Some(at(from)),
            end: Some(at(to)),
        }
    }

    // --- HourSlots ---

    #[test]
    fn default_window_has_sixteen_slots() {
        let slots = HourSlots::default();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.times()[0], hm("07:00"));
        assert_eq!(slots.times()[15], hm("22:00"));
    }

    #[test]
    fn invalid_window_is_rejected() {
        assert!(HourSlots::new(10, 9).is_err());
        assert!(HourSlots::new(7, 24).is_err());
    }

    // --- build_matrix ---

    #[test]
    fn boundary_slot_is_not_active() {
        let blocks = [block("a", "recV", "Bar", "2024-08-11", "09:00", "10:00")];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        assert_eq!(m.blocks_at("recV", hm("09:00")).len(), 1);
        assert!(m.blocks_at("recV", hm("10:00")).is_empty());
    }

    #[test]
    fn overlapping_blocks_are_not_collapsed() {
        let blocks = [
            block("a", "recV", "Kassa", "2024-08-11", "09:00", "09:30"),
            block("b", "recV", "Bar", "2024-08-11", "09:15", "10:00"),
        ];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        let at_nine: Vec<_> = m
            .blocks_at("recV", hm("09:00"))
            .iter()
            .map(|b| (b.id.as_str(), b.department.as_str()))
            .collect();
        assert_eq!(at_nine, vec![("a", "Kassa"), ("b", "Bar")]);

        // Neither block reaches into the 10:00 slot.
        assert!(m.blocks_at("recV", hm("10:00")).is_empty());
    }

    #[test]
    fn blocks_sharing_a_slot_are_all_kept() {
        let blocks = [
            block("a", "recV", "Kassa", "2024-08-11", "08:30", "09:30"),
            block("b", "recV", "Bar", "2024-08-11", "09:00", "10:00"),
        ];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        let at_nine: Vec<_> = m
            .blocks_at("recV", hm("09:00"))
            .iter()
            .map(|b| b.department.as_str())
            .collect();
        assert_eq!(at_nine, vec!["Kassa", "Bar"]);
    }

    #[test]
    fn only_volunteers_with_blocks_that_day_appear() {
        let blocks = [
            block("a", "recAnna", "Bar", "2024-08-11", "14:00", "18:00"),
            block("b", "recBram", "Bar", "2024-08-12", "14:00", "18:00"),
        ];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        assert_eq!(m.rows.len(), 1);
        assert!(m.row("recBram").is_none());
    }

    #[test]
    fn other_events_are_ignored() {
        let mut other = block("a", "recV", "Bar", "2024-08-11", "14:00", "18:00");
        other.event_id = Some("recOther".into());
        let m = build_matrix(&[other], "recFair", date("2024-08-11"), &HourSlots::default());
        assert!(m.is_empty());
    }

    #[test]
    fn rows_follow_first_appearance() {
        let blocks = [
            block("a", "recZoe", "Bar", "2024-08-11", "08:00", "09:00"),
            block("b", "recAnna", "Bar", "2024-08-11", "10:00", "11:00"),
            block("c", "recZoe", "Kassa", "2024-08-11", "12:00", "13:00"),
        ];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        let order: Vec<_> = m.rows.iter().map(|r| r.volunteer_id.as_deref()).collect();
        assert_eq!(order, vec![Some("recZoe"), Some("recAnna")]);
    }

    #[test]
    fn block_outside_window_still_gets_a_row() {
        let blocks = [block("a", "recNight", "Bar", "2024-08-11", "23:00", "23:30")];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        let row = m.row("recNight").unwrap();
        assert!((0..m.slots.len()).all(|i| !row.is_active_at(i)));
    }

    #[test]
    fn block_without_volunteer_keeps_its_row() {
        let mut orphan = block("a", "recV", "Bar", "2024-08-11", "14:00", "15:00");
        orphan.volunteer_id = None;
        let m = build_matrix(&[orphan], "recFair", date("2024-08-11"), &HourSlots::default());

        assert_eq!(m.rows.len(), 1);
        let row = &m.rows[0];
        assert_eq!(row.volunteer_id, None);
        assert!(row.is_active_at(m.slot_index(hm("14:00")).unwrap()));
        assert!(!row.is_active_at(m.slot_index(hm("15:00")).unwrap()));
    }

    #[test]
    fn inverted_block_is_never_active() {
        let blocks = [block("a", "recV", "Bar", "2024-08-11", "14:30", "14:00")];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        let row = m.row("recV").unwrap();
        assert!((0..m.slots.len()).all(|i| !row.is_active_at(i)));
    }

    #[test]
    fn afternoon_shift_covers_four_slots() {
        let blocks = [block("a", "recV", "Bar", "2024-08-11", "14:00", "18:00")];
        let m = build_matrix(&blocks, "recFair", date("2024-08-11"), &HourSlots::default());

        for active in ["14:00", "15:00", "16:00", "17:00"] {
            assert_eq!(m.blocks_at("recV", hm(active)).len(), 1, "{active}");
        }
        for inactive in ["13:00", "18:00"] {
            assert!(m.blocks_at("recV", hm(inactive)).is_empty(), "{inactive}");
        }
    }
}
