//! Engine state owned by one run.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::patterns::PatternTable;
use crate::config::{DutyPlanConfig, EngineConfig};
use crate::eligibility::PeriodMap;
use crate::error::{Error, Result};
use crate::models::{Calendar, DutyCatalog, Holiday, Roster, Staff};
use crate::validation::validate_input;

/// Allocation engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Grouping school days into patterns.
    BuildPatterns,
    /// Filling non-filler duties, one occupant per side.
    AssignPrimary,
    /// Filling filler duties, one occupant per side.
    AssignFiller,
    /// Topping up quotas with the relaxed occupancy cap.
    Reconcile,
    /// Roster copied onto the calendar.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::BuildPatterns => "BUILD_PATTERNS",
            Phase::AssignPrimary => "ASSIGN_PRIMARY",
            Phase::AssignFiller => "ASSIGN_FILLER",
            Phase::Reconcile => "RECONCILE",
            Phase::Done => "DONE",
        };
        f.write_str(label)
    }
}

/// Everything one allocation run reads and mutates.
///
/// The engine holds no state of its own; every pass takes the context by
/// `&mut`, so two runs can never interleave over the same roster.
#[derive(Debug, Clone)]
pub struct EngineContext {
    pub(crate) calendar: Calendar,
    pub(crate) catalog: DutyCatalog,
    pub(crate) period_map: PeriodMap,
    pub(crate) config: EngineConfig,
    pub(crate) staff: Vec<Staff>,
    pub(crate) patterns: PatternTable,
    pub(crate) roster: Roster,
    pub(crate) order: Vec<usize>,
    pub(crate) phase: Phase,
}

impl EngineContext {
    /// Validates the inputs and prepares a run.
    ///
    /// Stamps the catalog onto every school day of the calendar.
    ///
    /// # Errors
    /// [`Error::Validation`] with every problem found.
    pub fn new(
        mut calendar: Calendar,
        staff: Vec<Staff>,
        catalog: DutyCatalog,
        period_map: PeriodMap,
        config: EngineConfig,
    ) -> Result<Self> {
        validate_input(&staff, calendar.holidays(), &catalog, &period_map)
            .map_err(Error::Validation)?;

        calendar.stamp_duties(&catalog);
        let roster = Roster::stamp(&catalog);
        let order = (0..staff.len()).collect();

        Ok(Self {
            calendar,
            catalog,
            period_map,
            config,
            staff,
            patterns: PatternTable::default(),
            roster,
            order,
            phase: Phase::BuildPatterns,
        })
    }

    /// Builds the calendar from a plan and applies its quota tables to
    /// every staff member.
    pub fn from_config(
        config: DutyPlanConfig,
        holidays: Vec<Holiday>,
        mut staff: Vec<Staff>,
    ) -> Result<Self> {
        let calendar = Calendar::initialize_year(config.school_year, holidays)?;
        for s in staff.iter_mut() {
            s.set_quota_policy(config.quota.clone());
        }
        Self::new(
            calendar,
            staff,
            config.catalog,
            config.period_map,
            config.engine,
        )
    }

    /// Calendar (duties copied on in DONE).
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Daily duty catalog.
    pub fn catalog(&self) -> &DutyCatalog {
        &self.catalog
    }

    /// Duty slot → period table.
    pub fn period_map(&self) -> &PeriodMap {
        &self.period_map
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Staff in input order.
    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    /// Staff member by name.
    pub fn staff_member(&self, name: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.name() == name)
    }

    /// Pattern weights (empty before BUILD_PATTERNS).
    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// The roster being filled.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Staff indices in the order passes visit them.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}
