//! School-year calendar model.
//!
//! Turns a school year (fixed start/end, four term boundaries, rotation
//! anchors) plus a list of holiday records into one [`Day`] per calendar
//! date, each tagged with its term, its Day-1/Day-2 rotation and whether
//! school is in session.
//!
//! # Holiday intervals
//! Holiday records use the feed's half-open convention: the start date
//! is cancelled, the end date is not. A record whose end equals its start
//! still cancels the start date.
//!
//! # Rotation
//! Two rules are available, see [`RotationRule`]. Both count from a
//! term-specific anchor date, so every term restarts on Day 1.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::duty::{Duty, DutyCatalog, DutyGrid};
use super::staff::PERIODS_PER_SEMESTER;
use crate::error::{Error, Result};

/// Number of terms in a school year.
pub const TERMS: usize = 4;

/// Furthest a rotation anchor may sit from its term start, in days.
const MAX_ANCHOR_OFFSET_DAYS: i64 = 31;

/// Weekdays that carry school days, in scan order.
pub const SCHOOL_WEEK: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Day-1/Day-2 rotation side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// First day of the two-day cycle.
    Day1,
    /// Second day of the two-day cycle.
    Day2,
}

impl Rotation {
    /// Both sides, Day 1 first.
    pub const ALL: [Rotation; 2] = [Rotation::Day1, Rotation::Day2];

    /// Day 1 on even offsets, Day 2 on odd ones.
    #[inline]
    pub fn from_parity(offset: i64) -> Self {
        if offset.rem_euclid(2) == 0 {
            Rotation::Day1
        } else {
            Rotation::Day2
        }
    }

    /// The other side of the cycle.
    pub fn opposite(self) -> Self {
        match self {
            Rotation::Day1 => Rotation::Day2,
            Rotation::Day2 => Rotation::Day1,
        }
    }

    /// Display label ("Day 1" / "Day 2").
    pub fn label(self) -> &'static str {
        match self {
            Rotation::Day1 => "Day 1",
            Rotation::Day2 => "Day 2",
        }
    }
}

/// Half of the school year sharing one duty quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    /// Terms 0 and 1; timetable periods 0-4.
    First,
    /// Terms 2 and 3; timetable periods 5-9.
    Second,
}

impl Semester {
    /// Both semesters in calendar order.
    pub const ALL: [Semester; 2] = [Semester::First, Semester::Second];

    /// 0 for the first semester, 1 for the second.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Semester::First => 0,
            Semester::Second => 1,
        }
    }

    /// The two consecutive terms of this semester.
    pub fn terms(self) -> [usize; 2] {
        let first = self.index() * 2;
        [first, first + 1]
    }

    /// Semester containing a term (terms past 3 count as the second).
    pub fn of_term(term: usize) -> Self {
        if term < 2 {
            Semester::First
        } else {
            Semester::Second
        }
    }

    /// The other semester.
    pub fn opposite(self) -> Self {
        match self {
            Semester::First => Semester::Second,
            Semester::Second => Semester::First,
        }
    }

    /// Index of this semester's first period in a 10-period timetable.
    #[inline]
    pub fn period_offset(self) -> usize {
        self.index() * PERIODS_PER_SEMESTER
    }
}

/// How the Day-1/Day-2 bit is derived for a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationRule {
    /// Parity of calendar days since the term anchor. Each weekday flips
    /// rotation every week; holidays never shift the cycle.
    #[default]
    CalendarParity,
    /// Parity of school days since the term anchor. Holidays shift the
    /// cycle so that consecutive school days always alternate.
    SchoolDayParity,
}

/// Fixed boundaries of one school year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolYear {
    /// First calendar date (inclusive).
    pub start: NaiveDate,
    /// Last calendar date (inclusive).
    pub end: NaiveDate,
    /// Start date of each of the four terms.
    pub term_starts: [NaiveDate; TERMS],
    /// Date from which each term's rotation is counted.
    pub rotation_anchors: [NaiveDate; TERMS],
    /// Rotation parity rule.
    pub rotation_rule: RotationRule,
}

impl SchoolYear {
    /// A single-term year: every date in `[start, end]` is in term 0 and
    /// the rotation is anchored on `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let after = end.succ_opt().unwrap_or(NaiveDate::MAX);
        let term_starts = [start, after, after, after];
        Self {
            start,
            end,
            term_starts,
            rotation_anchors: term_starts,
            rotation_rule: RotationRule::default(),
        }
    }

    /// Sets the term boundaries; rotation anchors follow the term starts.
    pub fn with_term_starts(mut self, term_starts: [NaiveDate; TERMS]) -> Self {
        self.term_starts = term_starts;
        self.rotation_anchors = term_starts;
        self
    }

    /// Sets the rotation anchors independently of the term starts.
    pub fn with_rotation_anchors(mut self, anchors: [NaiveDate; TERMS]) -> Self {
        self.rotation_anchors = anchors;
        self
    }

    /// Sets the rotation rule.
    pub fn with_rotation_rule(mut self, rule: RotationRule) -> Self {
        self.rotation_rule = rule;
        self
    }

    /// Checks that the year is not inverted, the terms are ordered and
    /// start inside the year, and each rotation anchor lies near its term.
    ///
    /// Terms may start after `end`; such terms are simply empty.
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(Error::InvalidSchoolYear(format!(
                "year ends {} before it starts {}",
                self.end, self.start
            )));
        }
        if self.term_starts.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidSchoolYear(
                "term start dates must be non-decreasing".into(),
            ));
        }
        let first = self.term_starts[0];
        if !self.contains(first) {
            return Err(Error::InvalidSchoolYear(format!(
                "first term starts {first}, outside the year {} to {}",
                self.start, self.end
            )));
        }
        for (term, (start, anchor)) in self
            .term_starts
            .iter()
            .zip(&self.rotation_anchors)
            .enumerate()
        {
            if *start > self.end {
                continue;
            }
            if start.signed_duration_since(*anchor).num_days().abs() > MAX_ANCHOR_OFFSET_DAYS {
                return Err(Error::InvalidSchoolYear(format!(
                    "rotation anchor {anchor} of term {} is too far from its start {start}",
                    term + 1
                )));
            }
        }
        Ok(())
    }

    /// Term (0-3) containing `date`.
    ///
    /// Dates before the first term or after the end of the year clamp
    /// to term 3.
    pub fn term_of(&self, date: NaiveDate) -> usize {
        if date < self.term_starts[0] || date > self.end {
            return TERMS - 1;
        }
        self.term_starts
            .iter()
            .rposition(|start| *start <= date)
            .unwrap_or(TERMS - 1)
    }

    /// Rotation by calendar-day parity from the term anchor.
    pub fn calendar_rotation(&self, date: NaiveDate) -> Rotation {
        let anchor = self.rotation_anchors[self.term_of(date)];
        Rotation::from_parity(date.signed_duration_since(anchor).num_days())
    }

    /// Whether `date` falls in `[start, end]`.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl Default for SchoolYear {
    /// The 2024-2025 year the term boundaries were fixed for.
    fn default() -> Self {
        Self {
            start: ymd(2024, 9, 3),
            end: ymd(2025, 6, 28),
            term_starts: [
                ymd(2024, 9, 3),
                ymd(2024, 11, 7),
                ymd(2025, 2, 1),
                ymd(2025, 4, 8),
            ],
            rotation_anchors: [
                ymd(2024, 9, 1),
                ymd(2024, 11, 1),
                ymd(2025, 2, 1),
                ymd(2025, 4, 1),
            ],
            rotation_rule: RotationRule::CalendarParity,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// A holiday or closure record, end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Event summary (e.g. "Winter Break").
    pub summary: String,
    /// First cancelled date.
    pub start: NaiveDate,
    /// First date after the closure.
    pub end: NaiveDate,
    /// Free-form description.
    pub description: String,
}

impl Holiday {
    /// Creates a holiday covering `[start, end)`.
    pub fn new(summary: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
            description: String::new(),
        }
    }

    /// Creates a one-day closure.
    pub fn single_day(summary: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(summary, date, date.succ_opt().unwrap_or(date))
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this record cancels `date`.
    #[inline]
    pub fn covers(&self, date: NaiveDate) -> bool {
        date == self.start || (date > self.start && date < self.end)
    }
}

/// One calendar date of the school year.
#[derive(Debug, Clone)]
pub struct Day {
    date: NaiveDate,
    is_school_day: bool,
    term: usize,
    rotation: Rotation,
    duties: DutyGrid,
}

impl Day {
    /// Calendar date.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether school is in session.
    #[inline]
    pub fn is_school_day(&self) -> bool {
        self.is_school_day
    }

    /// Term index (0-3).
    #[inline]
    pub fn term(&self) -> usize {
        self.term
    }

    /// Rotation side.
    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether this is a Day 1.
    #[inline]
    pub fn is_day1(&self) -> bool {
        self.rotation == Rotation::Day1
    }

    /// Day of the week.
    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Places a duty in the grid. Returns `false` when out of range.
    pub fn add_duty(&mut self, slot: usize, position: usize, duty: Duty) -> bool {
        self.duties.add_duty(slot, position, duty)
    }

    /// All duties of this day in (slot, position) order.
    pub fn duties(&self) -> impl Iterator<Item = (usize, usize, &Duty)> {
        self.duties.duties()
    }

    /// The duty grid.
    pub fn duty_grid(&self) -> &DutyGrid {
        &self.duties
    }

    pub(crate) fn duty_grid_mut(&mut self) -> &mut DutyGrid {
        &mut self.duties
    }
}

/// The school year as a sequence of days.
#[derive(Debug, Clone)]
pub struct Calendar {
    year: SchoolYear,
    holidays: Vec<Holiday>,
    days: Vec<Day>,
}

impl Calendar {
    /// Builds one [`Day`] per date of the year.
    ///
    /// A date is a school day iff it is Monday-Friday and no holiday
    /// covers it. Duty grids start empty; see [`Calendar::stamp_duties`].
    pub fn initialize_year(year: SchoolYear, holidays: Vec<Holiday>) -> Result<Self> {
        year.validate()?;

        let mut days = Vec::new();
        // School days seen on or after each term's anchor.
        let mut since_anchor = [0i64; TERMS];

        for date in year.start.iter_days().take_while(|d| *d <= year.end) {
            let is_weekday = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            let is_school_day = is_weekday && !holidays.iter().any(|h| h.covers(date));
            let term = year.term_of(date);

            let rotation = match year.rotation_rule {
                RotationRule::CalendarParity => year.calendar_rotation(date),
                RotationRule::SchoolDayParity => {
                    if date < year.rotation_anchors[term] {
                        year.calendar_rotation(date)
                    } else {
                        let rotation = Rotation::from_parity(since_anchor[term]);
                        if is_school_day {
                            since_anchor[term] += 1;
                        }
                        rotation
                    }
                }
            };

            days.push(Day {
                date,
                is_school_day,
                term,
                rotation,
                duties: DutyGrid::default(),
            });
        }

        log::debug!(
            "initialized {} days ({} school days) from {} to {}",
            days.len(),
            days.iter().filter(|d| d.is_school_day).count(),
            year.start,
            year.end
        );

        Ok(Self {
            year,
            holidays,
            days,
        })
    }

    /// Stamps a fresh copy of the catalog onto every school day.
    pub fn stamp_duties(&mut self, catalog: &DutyCatalog) {
        for day in self.days.iter_mut() {
            day.duties = if day.is_school_day {
                catalog.stamp()
            } else {
                DutyGrid::default()
            };
        }
    }

    /// School year boundaries.
    pub fn year(&self) -> &SchoolYear {
        &self.year
    }

    /// Holiday records the calendar was built from.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// All days, in date order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub(crate) fn days_mut(&mut self) -> &mut [Day] {
        &mut self.days
    }

    /// School days only, in date order.
    pub fn school_days(&self) -> impl Iterator<Item = &Day> {
        self.days.iter().filter(|d| d.is_school_day)
    }

    /// Looks up a date.
    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.index_of(date).map(|i| &self.days[i])
    }

    /// Looks up a date for duty edits.
    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        self.index_of(date).map(move |i| &mut self.days[i])
    }

    /// Whether `date` is a school day (dates outside the year are not).
    pub fn is_school_day(&self, date: NaiveDate) -> bool {
        self.day(date).is_some_and(Day::is_school_day)
    }

    /// Term (0-3) of `date`.
    pub fn term_of(&self, date: NaiveDate) -> usize {
        self.year.term_of(date)
    }

    /// Rotation of `date`. Dates outside the year use calendar parity.
    pub fn rotation_of(&self, date: NaiveDate) -> Rotation {
        self.day(date)
            .map(Day::rotation)
            .unwrap_or_else(|| self.year.calendar_rotation(date))
    }

    /// Whether `date` is a Day 1.
    pub fn is_day1(&self, date: NaiveDate) -> bool {
        self.rotation_of(date) == Rotation::Day1
    }

    fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = date.signed_duration_since(self.year.start).num_days();
        usize::try_from(offset)
            .ok()
            .filter(|i| *i < self.days.len())
    }
}
