//! Duty catalog, duty grid and duty model.
//!
//! A school day carries a grid of duties indexed by `[time_slot][position]`.
//! Every school day is stamped from the same [`DutyCatalog`]; days differ
//! only in who occupies their duties.

use std::collections::BTreeSet;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::calendar::Rotation;

/// A supervisory duty with one occupant set per rotation side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duty {
    /// Duty name (e.g. "Cafeteria - Lunch A").
    pub name: String,
    /// Default room.
    pub room: String,
    /// Time slot label (e.g. "Lunch A").
    pub time_slot: String,
    day1: BTreeSet<String>,
    day2: BTreeSet<String>,
}

impl Duty {
    /// Creates an unoccupied duty.
    pub fn new(
        name: impl Into<String>,
        room: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            time_slot: time_slot.into(),
            day1: BTreeSet::new(),
            day2: BTreeSet::new(),
        }
    }

    /// Occupants on one rotation side.
    pub fn occupants(&self, rotation: Rotation) -> &BTreeSet<String> {
        match rotation {
            Rotation::Day1 => &self.day1,
            Rotation::Day2 => &self.day2,
        }
    }

    fn occupants_mut(&mut self, rotation: Rotation) -> &mut BTreeSet<String> {
        match rotation {
            Rotation::Day1 => &mut self.day1,
            Rotation::Day2 => &mut self.day2,
        }
    }

    /// Adds an occupant. Idempotent; returns `true` if newly added.
    pub fn add_occupant(&mut self, rotation: Rotation, name: impl Into<String>) -> bool {
        self.occupants_mut(rotation).insert(name.into())
    }

    /// Replaces one side's occupant set.
    pub fn set_occupants(&mut self, rotation: Rotation, names: BTreeSet<String>) {
        *self.occupants_mut(rotation) = names;
    }

    /// Number of occupants on one side.
    #[inline]
    pub fn occupancy(&self, rotation: Rotation) -> usize {
        self.occupants(rotation).len()
    }

    /// Whether at least one person covers this side.
    #[inline]
    pub fn is_filled(&self, rotation: Rotation) -> bool {
        !self.occupants(rotation).is_empty()
    }

    /// Whether `name` occupies either side.
    pub fn is_held_by(&self, name: &str) -> bool {
        self.day1.contains(name) || self.day2.contains(name)
    }

    /// Whether this is a filler duty (name contains `marker`).
    pub fn is_filler(&self, marker: &str) -> bool {
        self.name.contains(marker)
    }

    /// Removes every occupant from both sides.
    pub fn clear_occupants(&mut self) {
        self.day1.clear();
        self.day2.clear();
    }
}

/// Stable identifier of one pattern's side of a recurring duty:
/// (term, weekday, rotation, slot, position).
///
/// The Day 1 and Day 2 sides of a roster cell are separate duties, so the
/// same person may hold both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutyId {
    /// Term index (0-3).
    pub term: usize,
    /// Day of the week.
    pub weekday: Weekday,
    /// Rotation side.
    pub rotation: Rotation,
    /// Time slot index.
    pub slot: usize,
    /// Position within the time slot.
    pub position: usize,
}

impl DutyId {
    /// Creates a duty identifier.
    pub fn new(
        term: usize,
        weekday: Weekday,
        rotation: Rotation,
        slot: usize,
        position: usize,
    ) -> Self {
        Self {
            term,
            weekday,
            rotation,
            slot,
            position,
        }
    }
}

impl fmt::Display for DutyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T{} {} {} slot {}/{}",
            self.term + 1,
            self.weekday,
            self.rotation.label(),
            self.slot + 1,
            self.position + 1
        )
    }
}

/// Duties of one day, indexed by `[time_slot][position]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyGrid {
    slots: Vec<Vec<Option<Duty>>>,
}

impl DutyGrid {
    /// Creates an empty grid of `slot_count` rows, `positions` wide.
    pub fn new(slot_count: usize, positions: usize) -> Self {
        Self {
            slots: vec![vec![None; positions]; slot_count],
        }
    }

    /// Places a duty. Returns `false` if the cell is out of range.
    pub fn add_duty(&mut self, slot: usize, position: usize, duty: Duty) -> bool {
        match self.slots.get_mut(slot).and_then(|row| row.get_mut(position)) {
            Some(cell) => {
                *cell = Some(duty);
                true
            }
            None => false,
        }
    }

    /// Duty at a cell.
    pub fn duty(&self, slot: usize, position: usize) -> Option<&Duty> {
        self.slots.get(slot)?.get(position)?.as_ref()
    }

    /// Mutable duty at a cell.
    pub fn duty_mut(&mut self, slot: usize, position: usize) -> Option<&mut Duty> {
        self.slots.get_mut(slot)?.get_mut(position)?.as_mut()
    }

    /// Every placed duty with its coordinates, in scan order.
    pub fn duties(&self) -> impl Iterator<Item = (usize, usize, &Duty)> {
        self.slots.iter().enumerate().flat_map(|(slot, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(pos, cell)| cell.as_ref().map(|d| (slot, pos, d)))
        })
    }

    /// Coordinates of every placed duty, in scan order.
    pub fn coordinates(&self) -> Vec<(usize, usize)> {
        self.duties().map(|(slot, pos, _)| (slot, pos)).collect()
    }

    /// Number of time slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of placed duties.
    pub fn duty_count(&self) -> usize {
        self.duties().count()
    }

    /// Clears every occupant of every duty.
    pub fn clear_occupants(&mut self) {
        for duty in self.slots.iter_mut().flatten().flatten() {
            duty.clear_occupants();
        }
    }
}

/// A duty offered in a catalog time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyTemplate {
    /// Duty name.
    pub name: String,
    /// Default room.
    pub room: String,
}

/// One time slot of the catalog and the duties run in parallel in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSlot {
    /// Time slot label.
    pub label: String,
    /// Parallel duties, one per position.
    pub duties: Vec<DutyTemplate>,
}

impl CatalogSlot {
    /// Creates an empty slot.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            duties: Vec::new(),
        }
    }

    /// Adds a duty at the next position.
    pub fn with_duty(mut self, name: impl Into<String>, room: impl Into<String>) -> Self {
        self.duties.push(DutyTemplate {
            name: name.into(),
            room: room.into(),
        });
        self
    }
}

/// The fixed list of duties run on every school day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyCatalog {
    /// Time slots in scan order.
    pub slots: Vec<CatalogSlot>,
}

impl DutyCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Appends a time slot.
    pub fn with_slot(mut self, slot: CatalogSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Number of time slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Widest slot.
    pub fn max_positions(&self) -> usize {
        self.slots.iter().map(|s| s.duties.len()).max().unwrap_or(0)
    }

    /// (slot, position) of every catalog duty, in scan order.
    pub fn coordinates(&self) -> Vec<(usize, usize)> {
        self.slots
            .iter()
            .enumerate()
            .flat_map(|(slot, s)| (0..s.duties.len()).map(move |pos| (slot, pos)))
            .collect()
    }

    /// Builds a fresh, unoccupied grid of this catalog's duties.
    pub fn stamp(&self) -> DutyGrid {
        let mut grid = DutyGrid::new(self.slot_count(), self.max_positions());
        for (slot_idx, slot) in self.slots.iter().enumerate() {
            for (pos, template) in slot.duties.iter().enumerate() {
                grid.add_duty(
                    slot_idx,
                    pos,
                    Duty::new(&template.name, &template.room, &slot.label),
                );
            }
        }
        grid
    }
}

impl Default for DutyCatalog {
    /// Eleven single-duty slots: period duties, three lunch duties and a
    /// hall sweep for each period.
    fn default() -> Self {
        Self::new()
            .with_slot(CatalogSlot::new("Period 1").with_duty("DDC - Period 1", "DDC"))
            .with_slot(CatalogSlot::new("Period 1").with_duty("Hall - Period 1", "Main Hall"))
            .with_slot(CatalogSlot::new("Period 2").with_duty("Library - Period 2", "Library"))
            .with_slot(CatalogSlot::new("Period 2").with_duty("Hall - Period 2", "Main Hall"))
            .with_slot(CatalogSlot::new("Lunch A").with_duty("Cafeteria - Lunch A", "Cafeteria"))
            .with_slot(CatalogSlot::new("Lunch B").with_duty("Cafeteria - Lunch B", "Cafeteria"))
            .with_slot(CatalogSlot::new("Lunch").with_duty("Hall - Lunch", "Main Hall"))
            .with_slot(CatalogSlot::new("Period 3").with_duty("DDC - Period 3", "DDC"))
            .with_slot(CatalogSlot::new("Period 3").with_duty("Hall - Period 3", "Main Hall"))
            .with_slot(CatalogSlot::new("Period 4").with_duty("Library - Period 4", "Library"))
            .with_slot(CatalogSlot::new("Period 4").with_duty("Hall - Period 4", "Main Hall"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_occupant_is_idempotent() {
        let mut duty = Duty::new("Cafeteria - Lunch A", "Cafeteria", "Lunch A");
        assert!(duty.add_occupant(Rotation::Day1, "Smith"));
        assert!(!duty.add_occupant(Rotation::Day1, "Smith"));
        assert_eq!(duty.occupancy(Rotation::Day1), 1);
        assert!(duty.is_filled(Rotation::Day1));
        assert!(!duty.is_filled(Rotation::Day2));
        assert!(duty.is_held_by("Smith"));
    }

    #[test]
    fn test_filler_marker() {
        let hall = Duty::new("Hall - Lunch", "Main Hall", "Lunch");
        let ddc = Duty::new("DDC - Period 1", "DDC", "Period 1");
        assert!(hall.is_filler("Hall"));
        assert!(!ddc.is_filler("Hall"));
    }

    #[test]
    fn test_grid_out_of_range_refused() {
        let mut grid = DutyGrid::new(2, 1);
        assert!(grid.add_duty(1, 0, Duty::new("A", "R", "S")));
        assert!(!grid.add_duty(2, 0, Duty::new("B", "R", "S")));
        assert!(!grid.add_duty(0, 1, Duty::new("C", "R", "S")));
        assert_eq!(grid.duty_count(), 1);
        assert!(grid.duty(0, 0).is_none());
        assert_eq!(grid.duty(1, 0).map(|d| d.name.as_str()), Some("A"));
    }

    #[test]
    fn test_default_catalog_shape() {
        let catalog = DutyCatalog::default();
        assert_eq!(catalog.slot_count(), 11);
        assert_eq!(catalog.max_positions(), 1);

        let grid = catalog.stamp();
        assert_eq!(grid.duty_count(), 11);
        let fillers = grid.duties().filter(|(_, _, d)| d.is_filler("Hall")).count();
        assert_eq!(fillers, 5);
    }

    #[test]
    fn test_stamp_is_fresh() {
        let catalog = DutyCatalog::default();
        let mut a = catalog.stamp();
        a.duty_mut(0, 0).unwrap().add_occupant(Rotation::Day1, "Smith");
        let b = catalog.stamp();
        assert!(!b.duty(0, 0).unwrap().is_filled(Rotation::Day1));
    }

    #[test]
    fn test_ragged_catalog() {
        let catalog = DutyCatalog::new()
            .with_slot(CatalogSlot::new("Lunch").with_duty("Cafeteria", "Caf").with_duty("Hall", "Hall"))
            .with_slot(CatalogSlot::new("Period 1").with_duty("DDC", "DDC"));
        let grid = catalog.stamp();
        assert_eq!(grid.coordinates(), vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(catalog.coordinates(), grid.coordinates());
    }

    #[test]
    fn test_duty_id_display() {
        let id = DutyId::new(0, Weekday::Mon, Rotation::Day2, 4, 0);
        assert_eq!(id.to_string(), "T1 Mon Day 2 slot 5/1");
        assert_ne!(id, DutyId::new(0, Weekday::Mon, Rotation::Day1, 4, 0));
    }
}
