//! Staff model: timetable, classification and duty quota.
//!
//! A staff member's classification (role and load tier) and semester
//! quota are derived from the timetable. They are recomputed whenever
//! the timetable or an explicit override changes, and stay frozen while
//! the allocation engine runs. The engine only touches the per-semester
//! [`DutyLoad`].
//!
//! # Course codes
//! Each period may hold several comma-separated course entries. The
//! course code of an entry is its first token after uppercasing and
//! stripping quotes, split on space or dash.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::calendar::Semester;
use super::duty::DutyId;
use crate::error::{Error, Result};

/// Timetable periods per school year.
pub const PERIODS: usize = 10;

/// Timetable periods per semester.
pub const PERIODS_PER_SEMESTER: usize = 5;

/// The fifth period of each semester, counted only when occupied.
pub const OPTIONAL_PERIODS: [usize; 2] = [4, 9];

/// Periods counted towards the load even when free.
const BASE_PERIODS: usize = PERIODS - OPTIONAL_PERIODS.len();

const COOP_CODES: &[&str] = &["1CO"];
const GYM_CODES: &[&str] = &["PPL"];
const GUIDANCE_CODES: &[&str] = &["2GU", "GLE"];
const CREDIT_RECOVERY_CODES: &[&str] = &["RCR", "1RC"];
const LIBRARY_CODES: &[&str] = &["2LI"];

/// A 10-period timetable. Empty (or blank) strings are free periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Timetable {
    periods: Vec<String>,
}

impl Timetable {
    /// Builds a timetable, padding missing periods as free.
    ///
    /// # Errors
    /// [`Error::TimetableLength`] when more than [`PERIODS`] are given.
    pub fn new<I, S>(periods: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut periods: Vec<String> = periods.into_iter().map(Into::into).collect();
        if periods.len() > PERIODS {
            return Err(Error::TimetableLength {
                len: periods.len(),
                max: PERIODS,
            });
        }
        periods.resize(PERIODS, String::new());
        Ok(Self { periods })
    }

    /// A timetable with every period free.
    pub fn free() -> Self {
        Self {
            periods: vec![String::new(); PERIODS],
        }
    }

    /// Raw period strings.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Content of one period (empty when out of range).
    pub fn period(&self, index: usize) -> &str {
        self.periods.get(index).map(String::as_str).unwrap_or("")
    }

    /// Whether a class is scheduled in `index`.
    #[inline]
    pub fn is_occupied(&self, index: usize) -> bool {
        !self.period(index).trim().is_empty()
    }

    /// Whether any period of the semester's half is occupied.
    pub fn has_class_in(&self, semester: Semester) -> bool {
        let offset = semester.period_offset();
        (offset..offset + PERIODS_PER_SEMESTER).any(|p| self.is_occupied(p))
    }

    /// Occupied periods, optional ones included.
    pub fn filled_periods(&self) -> usize {
        (0..PERIODS).filter(|&p| self.is_occupied(p)).count()
    }

    /// Occupied optional periods.
    pub fn occupied_optional(&self) -> usize {
        OPTIONAL_PERIODS
            .iter()
            .filter(|&&p| self.is_occupied(p))
            .count()
    }

    /// Teaching load fraction: filled periods over the periods that count.
    pub fn load(&self) -> f64 {
        self.filled_periods() as f64 / (BASE_PERIODS + self.occupied_optional()) as f64
    }

    /// Course codes of every course entry, in period order.
    pub fn course_codes(&self) -> impl Iterator<Item = String> + '_ {
        self.periods
            .iter()
            .filter(|p| !p.trim().is_empty())
            .flat_map(|p| p.split(','))
            .map(course_code)
            .filter(|code| !code.is_empty())
    }
}

impl TryFrom<Vec<String>> for Timetable {
    type Error = Error;

    fn try_from(periods: Vec<String>) -> Result<Self> {
        Self::new(periods)
    }
}

impl From<Timetable> for Vec<String> {
    fn from(timetable: Timetable) -> Self {
        timetable.periods
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::free()
    }
}

/// Extracts the course code from one course entry.
///
/// `"ppl1o-01 Gym"` yields `"PPL1O"`.
pub fn course_code(entry: &str) -> String {
    let cleaned = entry.to_uppercase().replace('"', "");
    cleaned
        .trim()
        .split([' ', ',', '-'])
        .next()
        .unwrap_or("")
        .to_string()
}

/// Staff role derived from the course families taught.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    /// Regular classroom teacher.
    #[default]
    Regular,
    /// Co-operative education.
    CoOp,
    /// Physical education.
    Gym,
    /// Guidance counsellor.
    Guidance,
    /// Credit recovery.
    CreditRecovery,
    /// Department head; only set explicitly.
    DepartmentHead,
}

impl StaffRole {
    /// Roles selectable from course codes, in tie-break order.
    const FAMILIES: [(StaffRole, &'static [&'static str]); 4] = [
        (StaffRole::CoOp, COOP_CODES),
        (StaffRole::Gym, GYM_CODES),
        (StaffRole::Guidance, GUIDANCE_CODES),
        (StaffRole::CreditRecovery, CREDIT_RECOVERY_CODES),
    ];

    /// Family of a single course code, if any.
    fn of_code(code: &str) -> Option<StaffRole> {
        Self::FAMILIES
            .iter()
            .find(|(_, codes)| codes.iter().any(|c| code.contains(*c)))
            .map(|(role, _)| *role)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StaffRole::Regular => "Regular",
            StaffRole::CoOp => "Co-op",
            StaffRole::Gym => "Gym",
            StaffRole::Guidance => "Guidance",
            StaffRole::CreditRecovery => "Credit Recovery",
            StaffRole::DepartmentHead => "Department Head",
        };
        f.write_str(label)
    }
}

/// Teaching load in sixths of a full timetable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadTier {
    /// No classes.
    #[default]
    None,
    /// 1 period.
    OneSixth,
    /// 2 periods.
    TwoSixths,
    /// 3 periods.
    ThreeSixths,
    /// 4 periods.
    FourSixths,
    /// 5 periods.
    FiveSixths,
    /// 6 periods.
    Full,
    /// 7 or more periods.
    OverFull,
}

impl LoadTier {
    /// Tier for a number of occupied periods.
    pub fn from_filled(filled: usize) -> Self {
        match filled {
            0 => LoadTier::None,
            1 => LoadTier::OneSixth,
            2 => LoadTier::TwoSixths,
            3 => LoadTier::ThreeSixths,
            4 => LoadTier::FourSixths,
            5 => LoadTier::FiveSixths,
            6 => LoadTier::Full,
            _ => LoadTier::OverFull,
        }
    }
}

impl fmt::Display for LoadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadTier::None => "0/6",
            LoadTier::OneSixth => "1/6",
            LoadTier::TwoSixths => "2/6",
            LoadTier::ThreeSixths => "3/6",
            LoadTier::FourSixths => "4/6",
            LoadTier::FiveSixths => "5/6",
            LoadTier::Full => "6/6",
            LoadTier::OverFull => ">6/6",
        };
        f.write_str(label)
    }
}

/// Derived classification of a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Dominant course family, or Regular.
    pub role: StaffRole,
    /// Load tier.
    pub tier: LoadTier,
    /// Teaches an exempt course family.
    pub exempt: bool,
    /// Load fraction.
    pub load: f64,
}

/// Classifies a timetable.
///
/// Any exempt course family marks the staff member exempt. The role is
/// the most frequent family across all course entries, ties going to
/// co-op, gym, guidance, credit recovery in that order. Library courses
/// are exempt but carry no role.
pub fn classify(timetable: &Timetable) -> Classification {
    let mut counts = [0usize; 4];
    let mut exempt = false;

    for code in timetable.course_codes() {
        if LIBRARY_CODES.iter().any(|c| code.contains(*c)) {
            exempt = true;
        }
        if let Some(role) = StaffRole::of_code(&code) {
            exempt = true;
            if let Some(i) = StaffRole::FAMILIES.iter().position(|(r, _)| *r == role) {
                counts[i] += 1;
            }
        }
    }

    // First strictly greater count wins, so earlier families take ties.
    let mut role = StaffRole::Regular;
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > best {
            best = count;
            role = StaffRole::FAMILIES[i].0;
        }
    }

    Classification {
        role,
        tier: LoadTier::from_filled(timetable.filled_periods()),
        exempt,
        load: timetable.load(),
    }
}

/// Semester duty quotas per role and load tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaPolicy {
    /// Guidance role (flat).
    pub guidance: u32,
    /// Department head role (flat).
    pub department_head: u32,
    /// Full load.
    pub full: u32,
    /// 5/6 load.
    pub five_sixths: u32,
    /// 4/6 load.
    pub four_sixths: u32,
    /// 3/6 load.
    pub three_sixths: u32,
    /// 2/6 load.
    pub two_sixths: u32,
    /// 1/6 load.
    pub one_sixth: u32,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            guidance: 25,
            department_head: 10,
            full: 14,
            five_sixths: 11,
            four_sixths: 9,
            three_sixths: 7,
            two_sixths: 6,
            one_sixth: 0,
        }
    }
}

impl QuotaPolicy {
    /// Semester quota for a classification. Exempt staff get 0.
    pub fn quota_for(&self, classification: &Classification) -> u32 {
        if classification.exempt {
            return 0;
        }
        match classification.role {
            StaffRole::Guidance => return self.guidance,
            StaffRole::DepartmentHead => return self.department_head,
            _ => {}
        }
        match classification.tier {
            LoadTier::Full => self.full,
            LoadTier::FiveSixths => self.five_sixths,
            LoadTier::FourSixths => self.four_sixths,
            LoadTier::ThreeSixths => self.three_sixths,
            LoadTier::TwoSixths => self.two_sixths,
            LoadTier::OneSixth => self.one_sixth,
            LoadTier::None | LoadTier::OverFull => 0,
        }
    }
}

/// One committed duty: a pattern's rotation side of a recurring duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAssignment {
    /// Duty identifier.
    pub duty: DutyId,
    /// Real occurrences represented (pattern weight).
    pub weight: u32,
}

impl DutyAssignment {
    /// Creates an assignment.
    pub fn new(duty: DutyId, weight: u32) -> Self {
        Self { duty, weight }
    }
}

/// Duties accrued in one semester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyLoad {
    /// Sum of committed assignment weights.
    pub count: u32,
    /// Duties held.
    pub duties: HashSet<DutyId>,
    /// Assignments in commit order.
    pub assignments: Vec<DutyAssignment>,
}

impl DutyLoad {
    fn clear(&mut self) {
        self.count = 0;
        self.duties.clear();
        self.assignments.clear();
    }
}

/// A staff member eligible for duties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    name: String,
    timetable: Timetable,
    classification: Classification,
    role_override: Option<StaffRole>,
    quota_override: Option<u32>,
    policy: QuotaPolicy,
    quota: u32,
    loads: [DutyLoad; 2],
}

impl Staff {
    /// Creates a staff member from raw period strings.
    ///
    /// # Errors
    /// [`Error::TimetableLength`] when more than [`PERIODS`] are given.
    pub fn new<I, S>(name: impl Into<String>, periods: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::with_timetable(name, Timetable::new(periods)?))
    }

    /// Creates a staff member from a parsed timetable.
    pub fn with_timetable(name: impl Into<String>, timetable: Timetable) -> Self {
        let mut staff = Self {
            name: name.into(),
            classification: classify(&timetable),
            timetable,
            role_override: None,
            quota_override: None,
            policy: QuotaPolicy::default(),
            quota: 0,
            loads: Default::default(),
        };
        staff.recompute();
        staff
    }

    /// Forces a role (the only way to get [`StaffRole::DepartmentHead`]).
    pub fn with_role(mut self, role: StaffRole) -> Self {
        self.role_override = Some(role);
        self.recompute();
        self
    }

    /// Forces a semester quota, overriding classification.
    pub fn with_quota(mut self, quota: u32) -> Self {
        self.quota_override = Some(quota);
        self.recompute();
        self
    }

    /// Uses a different quota table.
    pub fn with_quota_policy(mut self, policy: QuotaPolicy) -> Self {
        self.set_quota_policy(policy);
        self
    }

    /// Replaces the quota table and recomputes the quota.
    pub fn set_quota_policy(&mut self, policy: QuotaPolicy) {
        self.policy = policy;
        self.recompute();
    }

    /// Replaces the timetable and reclassifies.
    pub fn set_timetable(&mut self, timetable: Timetable) {
        self.timetable = timetable;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.classification = classify(&self.timetable);
        if let Some(role) = self.role_override {
            self.classification.role = role;
        }
        self.quota = self
            .quota_override
            .unwrap_or_else(|| self.policy.quota_for(&self.classification));
    }

    /// Name (unique within a run).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timetable.
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Derived classification, overrides applied.
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Role.
    pub fn role(&self) -> StaffRole {
        self.classification.role
    }

    /// Load tier.
    pub fn tier(&self) -> LoadTier {
        self.classification.tier
    }

    /// Whether an exempt course family is taught.
    pub fn is_exempt(&self) -> bool {
        self.classification.exempt
    }

    /// Maximum duty occurrences per semester.
    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Whether the staff member takes duties in `semester`.
    ///
    /// False only when the semester's half of the timetable is empty while
    /// the other half is not. An entirely empty timetable is no restriction.
    pub fn works_in(&self, semester: Semester) -> bool {
        if self.timetable.has_class_in(semester) {
            return true;
        }
        !self.timetable.has_class_in(semester.opposite())
    }

    /// Duty load of a semester.
    pub fn load(&self, semester: Semester) -> &DutyLoad {
        &self.loads[semester.index()]
    }

    /// Weighted duty count of a semester.
    pub fn assigned(&self, semester: Semester) -> u32 {
        self.loads[semester.index()].count
    }

    /// Weighted duty count over both semesters.
    pub fn total_assigned(&self) -> u32 {
        self.loads.iter().map(|l| l.count).sum()
    }

    /// Weighted duty count of one term.
    pub fn assigned_in_term(&self, term: usize) -> u32 {
        self.loads[Semester::of_term(term).index()]
            .assignments
            .iter()
            .filter(|a| a.duty.term == term)
            .map(|a| a.weight)
            .sum()
    }

    /// Quota left in a semester.
    pub fn remaining(&self, semester: Semester) -> u32 {
        self.quota.saturating_sub(self.assigned(semester))
    }

    /// Whether `weight` more occurrences fit under the quota.
    #[inline]
    pub fn has_capacity(&self, semester: Semester, weight: u32) -> bool {
        self.assigned(semester).saturating_add(weight) <= self.quota
    }

    /// Whether this rotation side of the duty is already held.
    pub fn holds(&self, duty: &DutyId) -> bool {
        self.loads[Semester::of_term(duty.term).index()]
            .duties
            .contains(duty)
    }

    /// Clears one semester's load.
    pub fn reset_for_semester(&mut self, semester: Semester) {
        self.loads[semester.index()].clear();
    }

    /// Commits an assignment.
    ///
    /// # Errors
    /// Nothing is mutated when the duty is already held
    /// ([`Error::DuplicateAssignment`]) or the weight would push the
    /// semester past quota ([`Error::QuotaExceeded`]).
    pub fn assign(&mut self, semester: Semester, assignment: DutyAssignment) -> Result<()> {
        let load = &self.loads[semester.index()];
        if load.duties.contains(&assignment.duty) {
            return Err(Error::DuplicateAssignment {
                staff: self.name.clone(),
                duty: assignment.duty.to_string(),
            });
        }
        if load.count.saturating_add(assignment.weight) > self.quota {
            return Err(Error::QuotaExceeded {
                staff: self.name.clone(),
                assigned: load.count,
                weight: assignment.weight,
                quota: self.quota,
            });
        }

        let load = &mut self.loads[semester.index()];
        load.count += assignment.weight;
        load.duties.insert(assignment.duty);
        load.assignments.push(assignment);
        Ok(())
    }
}

impl fmt::Display for Staff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Staff: {}", self.name)?;
        writeln!(f, "Role: {}", self.classification.role)?;
        writeln!(
            f,
            "Load: {} ({:.2})",
            self.classification.tier, self.classification.load
        )?;
        writeln!(
            f,
            "Duties: {}/{} | {}/{}",
            self.assigned(Semester::First),
            self.quota,
            self.assigned(Semester::Second),
            self.quota
        )?;
        for (i, period) in self.timetable.periods().iter().enumerate() {
            let marker = if OPTIONAL_PERIODS.contains(&i) { "*" } else { " " };
            let content = if period.trim().is_empty() {
                "FREE"
            } else {
                period.trim()
            };
            writeln!(f, "  Period {:>2}{}: {}", i + 1, marker, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rotation;
    use chrono::Weekday;

    fn full_timetable() -> Vec<&'static str> {
        vec![
            "ENG1D-01", "MTH1W-02", "SCI1D-01", "", "", "HIS2D-01", "CHC2D-03", "MTH1W-04", "", "",
        ]
    }

    fn duty(term: usize, slot: usize) -> DutyId {
        DutyId::new(term, Weekday::Mon, Rotation::Day1, slot, 0)
    }

    #[test]
    fn test_timetable_pads_and_rejects() {
        let t = Timetable::new(["ENG1D"]).unwrap();
        assert_eq!(t.periods().len(), PERIODS);
        assert!(t.is_occupied(0));
        assert!(!t.is_occupied(1));

        let too_long = Timetable::new(vec!["X"; 11]);
        assert!(matches!(
            too_long,
            Err(Error::TimetableLength { len: 11, max: 10 })
        ));
    }

    #[test]
    fn test_course_code() {
        assert_eq!(course_code("ppl1o-01 Gym"), "PPL1O");
        assert_eq!(course_code("\"GLE1OL-05\""), "GLE1OL");
        assert_eq!(course_code("  eng1d 01"), "ENG1D");
        assert_eq!(course_code(""), "");
    }

    #[test]
    fn test_full_load_quota() {
        let staff = Staff::new("Smith", full_timetable()).unwrap();
        assert_eq!(staff.tier(), LoadTier::Full);
        assert_eq!(staff.role(), StaffRole::Regular);
        assert!(!staff.is_exempt());
        assert_eq!(staff.quota(), 14);
        assert!((staff.classification().load - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_tier_quotas() {
        let policy = QuotaPolicy::default();
        let expected = [(1, 0), (2, 6), (3, 7), (4, 9), (5, 11), (6, 14), (7, 0), (0, 0)];
        for (filled, quota) in expected {
            let periods: Vec<&str> = (0..PERIODS)
                .map(|p| if p < filled { "ENG1D" } else { "" })
                .collect();
            let c = classify(&Timetable::new(periods).unwrap());
            assert_eq!(policy.quota_for(&c), quota, "filled = {filled}");
        }
    }

    #[test]
    fn test_occupied_optional_period_counts() {
        let mut periods = full_timetable();
        periods[4] = "ENG2D-01";
        let t = Timetable::new(periods).unwrap();
        assert_eq!(t.filled_periods(), 7);
        assert_eq!(t.occupied_optional(), 1);
        assert_eq!(classify(&t).tier, LoadTier::OverFull);
        assert!((t.load() - 7.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_guidance_code_is_exempt() {
        let staff = Staff::new("Jones", ["GLE1OL-05", "GLE2OL-01", "", "", "", "", "", "", "", ""])
            .unwrap();
        assert_eq!(staff.role(), StaffRole::Guidance);
        assert!(staff.is_exempt());
        assert_eq!(staff.quota(), 0);
    }

    #[test]
    fn test_library_exempt_without_role() {
        let c = classify(&Timetable::new(["2LI-01", "ENG1D", "MTH1W"]).unwrap());
        assert!(c.exempt);
        assert_eq!(c.role, StaffRole::Regular);
    }

    #[test]
    fn test_dominant_family_and_ties() {
        let gym_heavy = Timetable::new(["1CO4PD-01", "PPL1O-01", "PPL2O-01"]).unwrap();
        assert_eq!(classify(&gym_heavy).role, StaffRole::Gym);

        let tied = Timetable::new(["PPL1O-01", "1CO4PD-01"]).unwrap();
        assert_eq!(classify(&tied).role, StaffRole::CoOp);

        let multi = Timetable::new(["RCR1O-01, RCR2O-02", "GLE1OL-05"]).unwrap();
        assert_eq!(classify(&multi).role, StaffRole::CreditRecovery);
    }

    #[test]
    fn test_overrides() {
        let head = Staff::new("Lee", full_timetable())
            .unwrap()
            .with_role(StaffRole::DepartmentHead);
        assert_eq!(head.role(), StaffRole::DepartmentHead);
        assert_eq!(head.quota(), 10);

        let fixed = Staff::with_timetable("Free", Timetable::free()).with_quota(5);
        assert_eq!(fixed.quota(), 5);
    }

    #[test]
    fn test_works_in() {
        let both = Staff::new("A", full_timetable()).unwrap();
        assert!(both.works_in(Semester::First));
        assert!(both.works_in(Semester::Second));

        let first_only = Staff::new("B", ["ENG1D", "MTH1W"]).unwrap();
        assert!(first_only.works_in(Semester::First));
        assert!(!first_only.works_in(Semester::Second));

        let empty = Staff::with_timetable("C", Timetable::free());
        assert!(empty.works_in(Semester::First));
        assert!(empty.works_in(Semester::Second));
    }

    #[test]
    fn test_assign_respects_quota() {
        let mut staff = Staff::with_timetable("Free", Timetable::free()).with_quota(5);
        staff
            .assign(Semester::First, DutyAssignment::new(duty(0, 0), 3))
            .unwrap();
        assert_eq!(staff.assigned(Semester::First), 3);
        assert!(staff.has_capacity(Semester::First, 2));
        assert!(!staff.has_capacity(Semester::First, 3));

        let err = staff
            .assign(Semester::First, DutyAssignment::new(duty(0, 1), 3))
            .unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { assigned: 3, weight: 3, quota: 5, .. }));
        assert_eq!(staff.assigned(Semester::First), 3);
        assert!(!staff.holds(&duty(0, 1)));
    }

    #[test]
    fn test_assign_refuses_duplicate_duty() {
        let mut staff = Staff::with_timetable("Free", Timetable::free()).with_quota(10);
        staff
            .assign(Semester::First, DutyAssignment::new(duty(1, 2), 1))
            .unwrap();
        let err = staff
            .assign(Semester::First, DutyAssignment::new(duty(1, 2), 1))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAssignment { .. }));
        assert_eq!(staff.assigned(Semester::First), 1);
        assert_eq!(staff.assigned_in_term(1), 1);
        assert_eq!(staff.assigned_in_term(0), 0);
    }

    #[test]
    fn test_both_rotation_sides_are_separate_duties() {
        let mut staff = Staff::with_timetable("Free", Timetable::free()).with_quota(10);
        let day1 = duty(0, 3);
        let day2 = DutyId {
            rotation: Rotation::Day2,
            ..day1
        };
        staff
            .assign(Semester::First, DutyAssignment::new(day1, 2))
            .unwrap();
        assert!(staff.holds(&day1));
        assert!(!staff.holds(&day2));
        staff
            .assign(Semester::First, DutyAssignment::new(day2, 2))
            .unwrap();
        assert_eq!(staff.assigned(Semester::First), 4);
    }

    #[test]
    fn test_reset_clears_one_semester() {
        let mut staff = Staff::with_timetable("Free", Timetable::free()).with_quota(10);
        staff
            .assign(Semester::First, DutyAssignment::new(duty(0, 0), 2))
            .unwrap();
        staff
            .assign(Semester::Second, DutyAssignment::new(duty(2, 0), 4))
            .unwrap();
        staff.reset_for_semester(Semester::First);
        assert_eq!(staff.assigned(Semester::First), 0);
        assert!(!staff.holds(&duty(0, 0)));
        assert_eq!(staff.assigned(Semester::Second), 4);
        assert_eq!(staff.total_assigned(), 4);
    }

    #[test]
    fn test_timetable_serde() {
        let t = Timetable::new(["ENG1D", "", "MTH1W"]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let back: Timetable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let too_long = serde_json::to_string(&vec!["X"; 11]).unwrap();
        assert!(serde_json::from_str::<Timetable>(&too_long).is_err());
    }

    #[test]
    fn test_display_marks_optional_periods() {
        let staff = Staff::new("Smith", full_timetable()).unwrap();
        let text = staff.to_string();
        assert!(text.contains("Staff: Smith"));
        assert!(text.contains("Period  5*: FREE"));
        assert!(text.contains("Period  1 : ENG1D-01"));
    }
}
