//! Duty eligibility rules.
//!
//! A duty time slot runs alongside one timetable period. A staff member
//! may take a duty only when that period is free; lunch duties also need
//! the bordering period free, so nobody leaves a class to cover lunch.
//!
//! The mapping is given per semester (periods 0-4); the semester's offset
//! selects the actual timetable period.

use serde::{Deserialize, Serialize};

use crate::models::{Semester, Timetable, PERIODS_PER_SEMESTER};

/// Timetable period(s) a duty slot overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRule {
    /// Period within the semester (0-4).
    pub period: usize,
    /// Bordering period that must also be free (lunch slots).
    #[serde(default)]
    pub adjacent: Option<usize>,
}

impl SlotRule {
    /// A slot overlapping one period.
    pub const fn period(period: usize) -> Self {
        Self {
            period,
            adjacent: None,
        }
    }

    /// A lunch slot bordering `adjacent`.
    pub const fn lunch(period: usize, adjacent: usize) -> Self {
        Self {
            period,
            adjacent: Some(adjacent),
        }
    }
}

/// Duty slot → timetable period table, indexed by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodMap {
    rules: Vec<SlotRule>,
}

impl PeriodMap {
    /// Builds a table; entry `i` describes slot `i`.
    pub fn new(rules: Vec<SlotRule>) -> Self {
        Self { rules }
    }

    /// Rule for a slot.
    pub fn rule(&self, slot: usize) -> Option<&SlotRule> {
        self.rules.get(slot)
    }

    /// All rules in slot order.
    pub fn rules(&self) -> &[SlotRule] {
        &self.rules
    }

    /// Number of mapped slots.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no slot is mapped.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Timetable index a slot overlaps in `semester`.
    ///
    /// `None` for unmapped slots or periods outside the semester.
    pub fn period_index(&self, semester: Semester, slot: usize) -> Option<usize> {
        self.rule(slot)
            .and_then(|r| to_index(semester, r.period))
    }
}

impl Default for PeriodMap {
    /// Table for the default eleven-slot catalog.
    fn default() -> Self {
        Self::new(vec![
            SlotRule::period(0),  // DDC - Period 1
            SlotRule::period(0),  // Hall - Period 1
            SlotRule::period(1),  // Library - Period 2
            SlotRule::period(1),  // Hall - Period 2
            SlotRule::lunch(1, 2), // Cafeteria - Lunch A
            SlotRule::lunch(1, 2), // Cafeteria - Lunch B
            SlotRule::lunch(1, 2), // Hall - Lunch
            SlotRule::period(2),  // DDC - Period 3
            SlotRule::period(2),  // Hall - Period 3
            SlotRule::period(3),  // Library - Period 4
            SlotRule::period(3),  // Hall - Period 4
        ])
    }
}

fn to_index(semester: Semester, period: usize) -> Option<usize> {
    (period < PERIODS_PER_SEMESTER).then(|| semester.period_offset() + period)
}

/// Whether a timetable leaves a duty slot free in `semester`.
///
/// Unknown slots and periods outside the semester are never eligible.
pub fn eligible(map: &PeriodMap, timetable: &Timetable, semester: Semester, slot: usize) -> bool {
    let Some(rule) = map.rule(slot) else {
        return false;
    };
    let Some(period) = to_index(semester, rule.period) else {
        return false;
    };
    if timetable.is_occupied(period) {
        return false;
    }
    match rule.adjacent {
        Some(adjacent) => {
            to_index(semester, adjacent).is_some_and(|p| !timetable.is_occupied(p))
        }
        None => true,
    }
}
