//! Recurring day patterns (BUILD_PATTERNS).
//!
//! Every school day falls into exactly one pattern: its term, weekday and
//! rotation side. Days of the same pattern share one set of duty
//! assignments, so the engine assigns each pattern once and charges the
//! pattern's weight (its number of school days) against staff quotas.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::{Calendar, Rotation, RosterKey, Semester, SCHOOL_WEEK, TERMS};

/// Pattern key: (term, weekday, rotation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    /// Term index (0-3).
    pub term: usize,
    /// Day of the week (Mon-Fri).
    pub weekday: Weekday,
    /// Rotation side.
    pub rotation: Rotation,
}

impl PatternKey {
    /// Creates a key.
    pub fn new(term: usize, weekday: Weekday, rotation: Rotation) -> Self {
        Self {
            term,
            weekday,
            rotation,
        }
    }

    /// Roster grid this pattern lives in.
    pub fn roster_key(&self) -> RosterKey {
        RosterKey::new(self.term, self.weekday)
    }

    /// Semester of the pattern's term.
    pub fn semester(&self) -> Semester {
        Semester::of_term(self.term)
    }
}

impl Ord for PatternKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.roster_key()
            .cmp(&other.roster_key())
            .then_with(|| self.rotation.cmp(&other.rotation))
    }
}

impl PartialOrd for PatternKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Term {} {} {}",
            self.term + 1,
            self.weekday,
            self.rotation.label()
        )
    }
}

/// Pattern weights for the whole year.
///
/// All 40 keys are present; a pattern with no school days has weight 0.
/// Iteration follows the scan order: term, then Monday to Friday, then
/// Day 1 before Day 2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternTable {
    weights: BTreeMap<PatternKey, u32>,
}

impl PatternTable {
    /// Groups the calendar's school days into patterns.
    pub fn build(calendar: &Calendar) -> Self {
        let mut weights: BTreeMap<PatternKey, u32> = (0..TERMS)
            .flat_map(|term| {
                SCHOOL_WEEK.iter().flat_map(move |&wd| {
                    Rotation::ALL
                        .iter()
                        .map(move |&rot| (PatternKey::new(term, wd, rot), 0))
                })
            })
            .collect();

        for day in calendar.school_days() {
            let key = PatternKey::new(day.term(), day.weekday(), day.rotation());
            *weights.entry(key).or_insert(0) += 1;
        }

        Self { weights }
    }

    /// Weight of a pattern (0 when unknown).
    pub fn weight(&self, key: &PatternKey) -> u32 {
        self.weights.get(key).copied().unwrap_or(0)
    }

    /// All patterns with their weights, in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (PatternKey, u32)> + '_ {
        self.weights.iter().map(|(k, w)| (*k, *w))
    }

    /// Patterns of a semester with at least one school day, in scan order.
    pub fn active_in(&self, semester: Semester) -> impl Iterator<Item = (PatternKey, u32)> + '_ {
        self.iter()
            .filter(move |(k, w)| *w > 0 && k.semester() == semester)
    }

    /// Combined weight of both rotation sides of a roster grid.
    pub fn roster_weight(&self, key: RosterKey) -> u32 {
        Rotation::ALL
            .iter()
            .map(|&rot| self.weight(&PatternKey::new(key.term, key.weekday, rot)))
            .sum()
    }

    /// Sum of all weights (school days in the year).
    pub fn total_weight(&self) -> u32 {
        self.weights.values().sum()
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table has not been built.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
