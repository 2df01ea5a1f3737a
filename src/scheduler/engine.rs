//! Greedy duty allocation.
//!
//! # Algorithm
//!
//! 1. BUILD_PATTERNS: group school days into (term, weekday, rotation)
//!    patterns and stamp an empty roster.
//! 2. Order staff once (input order or seeded shuffle).
//! 3. ASSIGN_PRIMARY: clear the roster and every load, then per staff
//!    member and semester scan the semester's patterns and every
//!    non-filler duty. A duty is taken when it is free and eligible, its
//!    pattern weight still fits the quota, and the person is not already
//!    on a post with the same time slot label in that pattern. Rescan
//!    until a scan makes no progress or the quota is reached.
//! 4. ASSIGN_FILLER: the same scan over filler duties.
//! 5. RECONCILE: the same scan over all duties with a second occupant
//!    allowed per rotation side.
//! 6. DONE: copy the roster onto the calendar.
//!
//! Staff who cannot reach quota are left short; see
//! [`DutyReport`](super::DutyReport).
//!
//! # Complexity
//! O(s · p · d · r) per pass, where s = staff, p = patterns per semester,
//! d = duties per day and r = rescans (bounded by the quota).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::context::{EngineContext, Phase};
use super::patterns::{PatternKey, PatternTable};
use super::report::DutyReport;
use crate::config::StaffOrdering;
use crate::eligibility::eligible;
use crate::models::{Duty, DutyAssignment, DutyId, Roster, Semester};

/// Which duties a pass may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DutyFilter {
    NonFiller,
    Filler,
    Any,
}

impl DutyFilter {
    fn accepts(self, duty: &Duty, marker: &str) -> bool {
        match self {
            DutyFilter::NonFiller => !duty.is_filler(marker),
            DutyFilter::Filler => duty.is_filler(marker),
            DutyFilter::Any => true,
        }
    }
}

/// One duty cell of one pattern.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    key: PatternKey,
    weight: u32,
    slot: usize,
    position: usize,
}

/// Greedy duty allocation engine.
///
/// Each phase is a separate method over an [`EngineContext`]; [`run`]
/// chains them.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use duty_roster::models::{Calendar, DutyCatalog, SchoolYear, Staff, Timetable};
/// use duty_roster::scheduler::{DutyAssigner, EngineContext};
/// use duty_roster::{EngineConfig, PeriodMap};
///
/// let year = SchoolYear::new(
///     NaiveDate::from_ymd_opt(2024, 9, 9).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 9, 13).unwrap(),
/// );
/// let calendar = Calendar::initialize_year(year, vec![]).unwrap();
/// let staff = vec![Staff::with_timetable("Smith", Timetable::free()).with_quota(3)];
///
/// let mut ctx = EngineContext::new(
///     calendar,
///     staff,
///     DutyCatalog::default(),
///     PeriodMap::default(),
///     EngineConfig::default(),
/// )
/// .unwrap();
/// let report = DutyAssigner::new().run(&mut ctx);
/// assert_eq!(report.staff[0].assigned[0], 3);
/// ```
///
/// [`run`]: DutyAssigner::run
#[derive(Debug, Clone, Default)]
pub struct DutyAssigner;

impl DutyAssigner {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Runs every phase and reports the result.
    pub fn run(&self, ctx: &mut EngineContext) -> DutyReport {
        self.build_patterns(ctx);
        self.order_staff(ctx);
        self.assign_primary(ctx);
        self.assign_filler(ctx);
        self.reconcile(ctx);
        self.finish(ctx);
        DutyReport::calculate(ctx)
    }

    /// BUILD_PATTERNS: computes pattern weights and stamps a fresh roster.
    pub fn build_patterns(&self, ctx: &mut EngineContext) {
        ctx.phase = Phase::BuildPatterns;
        ctx.patterns = PatternTable::build(&ctx.calendar);
        ctx.roster = Roster::stamp(&ctx.catalog);
        log::info!(
            "{}: {} patterns, {} school days",
            ctx.phase,
            ctx.patterns.iter().filter(|(_, w)| *w > 0).count(),
            ctx.patterns.total_weight()
        );
    }

    /// Fixes the order in which passes visit staff.
    pub fn order_staff(&self, ctx: &mut EngineContext) {
        let mut order: Vec<usize> = (0..ctx.staff.len()).collect();
        if let StaffOrdering::Shuffled { seed } = ctx.config.ordering {
            let mut rng = StdRng::seed_from_u64(seed);
            order.shuffle(&mut rng);
            log::debug!("staff shuffled with seed {seed}");
        }
        ctx.order = order;
    }

    /// ASSIGN_PRIMARY: clears the roster and semester loads, then fills
    /// non-filler duties. Returns the number of assignments made.
    pub fn assign_primary(&self, ctx: &mut EngineContext) -> usize {
        ctx.phase = Phase::AssignPrimary;
        ctx.roster = Roster::stamp(&ctx.catalog);
        for staff in ctx.staff.iter_mut() {
            for semester in Semester::ALL {
                staff.reset_for_semester(semester);
            }
        }
        let cap = ctx.config.primary_max_occupants;
        self.pass(ctx, DutyFilter::NonFiller, cap)
    }

    /// ASSIGN_FILLER: fills filler duties. Returns the number of
    /// assignments made.
    pub fn assign_filler(&self, ctx: &mut EngineContext) -> usize {
        ctx.phase = Phase::AssignFiller;
        let cap = ctx.config.primary_max_occupants;
        self.pass(ctx, DutyFilter::Filler, cap)
    }

    /// RECONCILE: tops up quotas over all duties with the relaxed cap.
    /// Returns the number of assignments made.
    pub fn reconcile(&self, ctx: &mut EngineContext) -> usize {
        ctx.phase = Phase::Reconcile;
        let cap = ctx.config.reconcile_max_occupants;
        self.pass(ctx, DutyFilter::Any, cap)
    }

    /// DONE: copies the roster onto every matching calendar day.
    pub fn finish(&self, ctx: &mut EngineContext) {
        ctx.roster.apply_to_calendar(&mut ctx.calendar);
        ctx.phase = Phase::Done;
        log::info!(
            "{}: {} staff, {} duty occurrences assigned",
            ctx.phase,
            ctx.staff.len(),
            ctx.staff.iter().map(|s| s.total_assigned()).sum::<u32>()
        );
    }

    fn pass(&self, ctx: &mut EngineContext, filter: DutyFilter, cap: usize) -> usize {
        let cells = ctx.catalog.coordinates();
        let order = ctx.order.clone();
        let mut made = 0;

        for idx in order {
            for semester in Semester::ALL {
                let staff = &ctx.staff[idx];
                if staff.quota() == 0 {
                    log::debug!("{}: {} has no quota", ctx.phase, staff.name());
                    break;
                }
                if !staff.works_in(semester) {
                    log::debug!(
                        "{}: {} does not teach in semester {}",
                        ctx.phase,
                        staff.name(),
                        semester.index() + 1
                    );
                    continue;
                }
                let candidates: Vec<Candidate> = ctx
                    .patterns
                    .active_in(semester)
                    .flat_map(|(key, weight)| {
                        cells.iter().map(move |&(slot, position)| Candidate {
                            key,
                            weight,
                            slot,
                            position,
                        })
                    })
                    .collect();
                made += self.fill_semester(ctx, idx, semester, &candidates, filter, cap);
            }
        }

        log::info!("{}: {made} assignments", ctx.phase);
        made
    }

    /// Scans `candidates` until a scan makes no progress or the quota is met.
    fn fill_semester(
        &self,
        ctx: &mut EngineContext,
        idx: usize,
        semester: Semester,
        candidates: &[Candidate],
        filter: DutyFilter,
        cap: usize,
    ) -> usize {
        let mut made = 0;
        loop {
            let mut progress = false;
            for candidate in candidates {
                if ctx.staff[idx].remaining(semester) == 0 {
                    return made;
                }
                if self.try_assign(ctx, idx, semester, candidate, filter, cap) {
                    made += 1;
                    progress = true;
                }
            }
            if !progress {
                return made;
            }
        }
    }

    fn try_assign(
        &self,
        ctx: &mut EngineContext,
        idx: usize,
        semester: Semester,
        c: &Candidate,
        filter: DutyFilter,
        cap: usize,
    ) -> bool {
        let key = c.key;
        let Some(duty) = ctx.roster.duty(key.term, key.weekday, c.slot, c.position) else {
            return false;
        };
        if !filter.accepts(duty, &ctx.config.filler_marker) || duty.occupancy(key.rotation) >= cap {
            return false;
        }

        let staff = &ctx.staff[idx];
        let id = DutyId::new(key.term, key.weekday, key.rotation, c.slot, c.position);
        if staff.holds(&id)
            || !staff.has_capacity(semester, c.weight)
            || !eligible(&ctx.period_map, staff.timetable(), semester, c.slot)
            || is_busy(ctx, staff.name(), &duty.time_slot, c)
        {
            return false;
        }

        let name = staff.name().to_string();
        if let Err(e) = ctx.staff[idx].assign(semester, DutyAssignment::new(id, c.weight)) {
            log::warn!("{}: refused assignment: {e}", ctx.phase);
            return false;
        }
        let duty_name = match ctx.roster.duty_mut(key.term, key.weekday, c.slot, c.position) {
            Some(duty) => {
                duty.add_occupant(key.rotation, name.clone());
                duty.name.clone()
            }
            None => String::new(),
        };
        log::debug!(
            "{}: {name} -> {duty_name} ({key}, weight {})",
            ctx.phase,
            c.weight
        );
        true
    }
}

/// Whether `name` already covers another duty with the same time slot
/// label in this pattern.
fn is_busy(ctx: &EngineContext, name: &str, time_slot: &str, c: &Candidate) -> bool {
    let Some(grid) = ctx.roster.grid(c.key.term, c.key.weekday) else {
        return false;
    };
    grid.duties().any(|(slot, pos, duty)| {
        (slot, pos) != (c.slot, c.position)
            && duty.time_slot == time_slot
            && duty.occupants(c.key.rotation).contains(name)
    })
}
