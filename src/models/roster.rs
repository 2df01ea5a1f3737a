//! Duty roster: one duty grid per (term, weekday).
//!
//! The Day-1 side of a grid's duties belongs to the pattern
//! (term, weekday, Day 1) and the Day-2 side to (term, weekday, Day 2).
//! Filling a roster duty fills it for every school day of that pattern;
//! [`Roster::apply_to_calendar`] copies the result onto the days.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::calendar::{Calendar, Rotation, SCHOOL_WEEK, TERMS};
use super::duty::{Duty, DutyCatalog, DutyGrid};

/// Grid key: a term and a school weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterKey {
    /// Term index (0-3).
    pub term: usize,
    /// Day of the week.
    pub weekday: Weekday,
}

impl RosterKey {
    /// Creates a key.
    pub fn new(term: usize, weekday: Weekday) -> Self {
        Self { term, weekday }
    }

    /// All term × weekday keys, in scan order.
    pub fn all() -> impl Iterator<Item = RosterKey> {
        (0..TERMS).flat_map(|term| SCHOOL_WEEK.iter().map(move |&wd| RosterKey::new(term, wd)))
    }
}

impl Ord for RosterKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.term.cmp(&other.term).then_with(|| {
            self.weekday
                .num_days_from_monday()
                .cmp(&other.weekday.num_days_from_monday())
        })
    }
}

impl PartialOrd for RosterKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Recurring duty assignments for the whole year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    grids: BTreeMap<RosterKey, DutyGrid>,
}

impl Roster {
    /// A fresh, unoccupied roster for every term and school weekday.
    pub fn stamp(catalog: &DutyCatalog) -> Self {
        Self {
            grids: RosterKey::all().map(|key| (key, catalog.stamp())).collect(),
        }
    }

    /// Grid of one term and weekday.
    pub fn grid(&self, term: usize, weekday: Weekday) -> Option<&DutyGrid> {
        self.grids.get(&RosterKey::new(term, weekday))
    }

    /// Mutable grid of one term and weekday.
    pub fn grid_mut(&mut self, term: usize, weekday: Weekday) -> Option<&mut DutyGrid> {
        self.grids.get_mut(&RosterKey::new(term, weekday))
    }

    /// A single duty.
    pub fn duty(&self, term: usize, weekday: Weekday, slot: usize, position: usize) -> Option<&Duty> {
        self.grid(term, weekday)?.duty(slot, position)
    }

    /// A single duty, mutable.
    pub fn duty_mut(
        &mut self,
        term: usize,
        weekday: Weekday,
        slot: usize,
        position: usize,
    ) -> Option<&mut Duty> {
        self.grid_mut(term, weekday)?.duty_mut(slot, position)
    }

    /// Occupants of a duty on one rotation side.
    pub fn occupants(
        &self,
        term: usize,
        weekday: Weekday,
        rotation: Rotation,
        slot: usize,
        position: usize,
    ) -> Option<&BTreeSet<String>> {
        self.duty(term, weekday, slot, position)
            .map(|d| d.occupants(rotation))
    }

    /// All grids in (term, weekday) order.
    pub fn iter(&self) -> impl Iterator<Item = (&RosterKey, &DutyGrid)> {
        self.grids.iter()
    }

    /// Every (key, rotation, slot, position) held by `name`.
    pub fn held_by(&self, name: &str) -> Vec<(RosterKey, Rotation, usize, usize)> {
        let mut held = Vec::new();
        for (key, grid) in &self.grids {
            for (slot, pos, duty) in grid.duties() {
                for rotation in Rotation::ALL {
                    if duty.occupants(rotation).contains(name) {
                        held.push((*key, rotation, slot, pos));
                    }
                }
            }
        }
        held
    }

    /// Copies each grid onto every school day of the matching pattern.
    ///
    /// A day receives only its own rotation side; the other side is left
    /// empty. Non-school days are untouched.
    pub fn apply_to_calendar(&self, calendar: &mut Calendar) {
        let mut applied = 0usize;
        for day in calendar.days_mut().iter_mut().filter(|d| d.is_school_day()) {
            let Some(grid) = self.grid(day.term(), day.weekday()) else {
                continue;
            };
            let other = day.rotation().opposite();
            let mut copy = grid.clone();
            for (slot, pos) in grid.coordinates() {
                if let Some(duty) = copy.duty_mut(slot, pos) {
                    duty.set_occupants(other, BTreeSet::new());
                }
            }
            *day.duty_grid_mut() = copy;
            applied += 1;
        }
        log::debug!("roster applied to {applied} school days");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::SchoolYear;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_stamp_covers_all_keys() {
        let roster = Roster::stamp(&DutyCatalog::default());
        assert_eq!(roster.iter().count(), 20);
        assert!(roster.grid(3, Weekday::Fri).is_some());
        assert!(roster.grid(0, Weekday::Sat).is_none());
        assert!(roster.grid(4, Weekday::Mon).is_none());
    }

    #[test]
    fn test_key_order() {
        let keys: Vec<RosterKey> = Roster::stamp(&DutyCatalog::default())
            .iter()
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(keys, RosterKey::all().collect::<Vec<_>>());
        assert_eq!(keys[0], RosterKey::new(0, Weekday::Mon));
        assert_eq!(keys[4], RosterKey::new(0, Weekday::Fri));
        assert_eq!(keys[5], RosterKey::new(1, Weekday::Mon));
    }

    #[test]
    fn test_occupants_query() {
        let mut roster = Roster::stamp(&DutyCatalog::default());
        roster
            .duty_mut(1, Weekday::Wed, 4, 0)
            .unwrap()
            .add_occupant(Rotation::Day2, "Smith");

        let day2 = roster.occupants(1, Weekday::Wed, Rotation::Day2, 4, 0).unwrap();
        assert!(day2.contains("Smith"));
        let day1 = roster.occupants(1, Weekday::Wed, Rotation::Day1, 4, 0).unwrap();
        assert!(day1.is_empty());
        assert!(roster.occupants(1, Weekday::Wed, Rotation::Day1, 40, 0).is_none());

        assert_eq!(
            roster.held_by("Smith"),
            vec![(RosterKey::new(1, Weekday::Wed), Rotation::Day2, 4, 0)]
        );
    }

    #[test]
    fn test_apply_copies_matching_side() {
        // Mon 2024-09-09 .. Fri 2024-09-20, anchored on the Monday.
        let year = SchoolYear::new(d(2024, 9, 9), d(2024, 9, 20));
        let mut cal = Calendar::initialize_year(year, vec![]).unwrap();
        let catalog = DutyCatalog::default();
        cal.stamp_duties(&catalog);

        let mut roster = Roster::stamp(&catalog);
        let duty = roster.duty_mut(0, Weekday::Mon, 0, 0).unwrap();
        duty.add_occupant(Rotation::Day1, "Smith");
        duty.add_occupant(Rotation::Day2, "Jones");
        roster.apply_to_calendar(&mut cal);

        let first = cal.day(d(2024, 9, 9)).unwrap();
        assert_eq!(first.rotation(), Rotation::Day1);
        let duty = first.duty_grid().duty(0, 0).unwrap();
        assert!(duty.occupants(Rotation::Day1).contains("Smith"));
        assert!(duty.occupants(Rotation::Day2).is_empty());

        let second = cal.day(d(2024, 9, 16)).unwrap();
        assert_eq!(second.rotation(), Rotation::Day2);
        let duty = second.duty_grid().duty(0, 0).unwrap();
        assert!(duty.occupants(Rotation::Day2).contains("Jones"));
        assert!(duty.occupants(Rotation::Day1).is_empty());

        let saturday = cal.day(d(2024, 9, 14)).unwrap();
        assert_eq!(saturday.duties().count(), 0);
    }
}
