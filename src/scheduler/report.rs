//! Roster quality report.
//!
//! Infeasibility is never an error: staff who end a run below quota and
//! duties nobody could cover are surfaced here instead.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Occurrences needed | Σ pattern weight × duties per day |
//! | Occurrences covered | Same sum over duties with an occupant |
//! | Fill rate | covered / needed |
//! | Shortfall | quota − assigned, per semester taught |

use std::fmt;

use serde::Serialize;

use super::context::EngineContext;
use super::patterns::PatternKey;
use crate::models::{LoadTier, Semester, StaffRole};

/// Per-staff outcome.
#[derive(Debug, Clone, Serialize)]
pub struct StaffSummary {
    /// Staff name.
    pub name: String,
    /// Role.
    pub role: StaffRole,
    /// Load tier.
    pub tier: LoadTier,
    /// Load fraction.
    pub load: f64,
    /// Semester quota.
    pub quota: u32,
    /// Duty occurrences assigned per semester.
    pub assigned: [u32; 2],
    /// Quota left unfilled per semester (0 for semesters not taught or
    /// without school days).
    pub shortfall: [u32; 2],
}

impl StaffSummary {
    /// Whether any semester ended below quota.
    pub fn is_under_quota(&self) -> bool {
        self.shortfall.iter().any(|&s| s > 0)
    }
}

/// A duty of a school-day pattern left without an occupant.
#[derive(Debug, Clone, Serialize)]
pub struct UnfilledDuty {
    /// Pattern.
    pub pattern: PatternKey,
    /// Pattern weight.
    pub weight: u32,
    /// Time slot index.
    pub slot: usize,
    /// Position within the slot.
    pub position: usize,
    /// Duty name.
    pub name: String,
}

/// Outcome of an allocation run.
#[derive(Debug, Clone, Serialize)]
pub struct DutyReport {
    /// One summary per staff member, input order.
    pub staff: Vec<StaffSummary>,
    /// Duty occurrences needing cover.
    pub occurrences_needed: u32,
    /// Duty occurrences with at least one occupant.
    pub occurrences_covered: u32,
    /// covered / needed (1.0 when nothing is needed).
    pub fill_rate: f64,
    /// Uncovered duties of patterns with school days.
    pub unfilled: Vec<UnfilledDuty>,
}

impl DutyReport {
    /// Computes the report from an engine context.
    pub fn calculate(ctx: &EngineContext) -> Self {
        let in_session = Semester::ALL.map(|sem| ctx.patterns().active_in(sem).next().is_some());
        let staff: Vec<StaffSummary> = ctx
            .staff()
            .iter()
            .map(|s| {
                let assigned = Semester::ALL.map(|sem| s.assigned(sem));
                let shortfall = Semester::ALL.map(|sem| {
                    if in_session[sem.index()] && s.works_in(sem) {
                        s.remaining(sem)
                    } else {
                        0
                    }
                });
                StaffSummary {
                    name: s.name().to_string(),
                    role: s.role(),
                    tier: s.tier(),
                    load: s.classification().load,
                    quota: s.quota(),
                    assigned,
                    shortfall,
                }
            })
            .collect();

        let mut needed = 0;
        let mut covered = 0;
        let mut unfilled = Vec::new();
        for (pattern, weight) in ctx.patterns().iter().filter(|(_, w)| *w > 0) {
            let Some(grid) = ctx.roster().grid(pattern.term, pattern.weekday) else {
                continue;
            };
            for (slot, position, duty) in grid.duties() {
                needed += weight;
                if duty.is_filled(pattern.rotation) {
                    covered += weight;
                } else {
                    unfilled.push(UnfilledDuty {
                        pattern,
                        weight,
                        slot,
                        position,
                        name: duty.name.clone(),
                    });
                }
            }
        }

        let fill_rate = if needed == 0 {
            1.0
        } else {
            covered as f64 / needed as f64
        };

        Self {
            staff,
            occurrences_needed: needed,
            occurrences_covered: covered,
            fill_rate,
            unfilled,
        }
    }

    /// Staff who ended a semester below quota.
    pub fn under_quota(&self) -> impl Iterator<Item = &StaffSummary> {
        self.staff.iter().filter(|s| s.is_under_quota())
    }

    /// Whether every duty occurrence is covered.
    pub fn is_fully_covered(&self) -> bool {
        self.unfilled.is_empty()
    }
}

impl fmt::Display for DutyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Coverage: {}/{} duty occurrences ({:.1}%)",
            self.occurrences_covered,
            self.occurrences_needed,
            self.fill_rate * 100.0
        )?;
        writeln!(f, "Unfilled pattern duties: {}", self.unfilled.len())?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<24} {:<16} {:>5} {:>5} {:>7} {:>7}",
            "Name", "Role", "Load", "Quota", "Sem 1", "Sem 2"
        )?;
        for s in &self.staff {
            writeln!(
                f,
                "{:<24} {:<16} {:>5} {:>5} {:>7} {:>7}",
                s.name,
                s.role.to_string(),
                s.tier.to_string(),
                s.quota,
                s.assigned[0],
                s.assigned[1]
            )?;
        }
        let short: Vec<&str> = self.under_quota().map(|s| s.name.as_str()).collect();
        if !short.is_empty() {
            writeln!(f)?;
            writeln!(f, "Below quota: {}", short.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, StaffOrdering};
    use crate::eligibility::{PeriodMap, SlotRule};
    use crate::models::{Calendar, CatalogSlot, DutyCatalog, SchoolYear, Staff, Timetable};
    use crate::scheduler::DutyAssigner;
    use chrono::NaiveDate;

    fn run(staff: Vec<Staff>) -> DutyReport {
        let year = SchoolYear::new(
            NaiveDate::from_ymd_opt(2024, 9, 9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 13).unwrap(),
        );
        let calendar = Calendar::initialize_year(year, vec![]).unwrap();
        let catalog = DutyCatalog::new()
            .with_slot(CatalogSlot::new("P1").with_duty("DDC - Period 1", "DDC"))
            .with_slot(CatalogSlot::new("P2").with_duty("Library - Period 2", "Library"));
        let map = PeriodMap::new(vec![SlotRule::period(0), SlotRule::period(1)]);
        let mut ctx = EngineContext::new(
            calendar,
            staff,
            catalog,
            map,
            EngineConfig::default().with_ordering(StaffOrdering::InputOrder),
        )
        .unwrap();
        DutyAssigner::new().run(&mut ctx)
    }

    #[test]
    fn test_full_coverage() {
        let report = run(vec![Staff::with_timetable("Smith", Timetable::free()).with_quota(10)]);
        assert_eq!(report.occurrences_needed, 10);
        assert_eq!(report.occurrences_covered, 10);
        assert!((report.fill_rate - 1.0).abs() < 1e-10);
        assert!(report.is_fully_covered());
        assert_eq!(report.under_quota().count(), 0);
    }

    #[test]
    fn test_partial_coverage_and_shortfall() {
        // Period 1 is taught: only the Library duty is possible.
        let report = run(vec![Staff::new("Smith", ["ENG1D"]).unwrap().with_quota(8)]);
        assert_eq!(report.occurrences_covered, 5);
        assert!((report.fill_rate - 0.5).abs() < 1e-10);
        assert_eq!(report.unfilled.len(), 5);
        assert!(report.unfilled.iter().all(|u| u.slot == 0));

        let smith = &report.staff[0];
        assert_eq!(smith.assigned, [5, 0]);
        // Second semester is not taught, so no shortfall there.
        assert_eq!(smith.shortfall, [3, 0]);
        assert_eq!(report.under_quota().count(), 1);
    }

    #[test]
    fn test_no_shortfall_without_school_days() {
        // The one-week year has no second-semester days at all.
        let report = run(vec![Staff::with_timetable("Smith", Timetable::free()).with_quota(12)]);
        let smith = &report.staff[0];
        assert_eq!(smith.assigned, [10, 0]);
        assert_eq!(smith.shortfall, [2, 0]);
    }

    #[test]
    fn test_display_lists_short_staff() {
        let report = run(vec![Staff::new("Smith", ["ENG1D"]).unwrap().with_quota(8)]);
        let text = report.to_string();
        assert!(text.contains("Coverage: 5/10"));
        assert!(text.contains("Below quota: Smith"));
    }
}
