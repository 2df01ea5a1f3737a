//! Duty roster domain models.
//!
//! Provides the data types the allocation engine works on: the school
//! calendar, the duty catalog and roster, and staff with their
//! timetables and quotas.
//!
//! # Domain Mappings
//!
//! | duty-roster | School office |
//! |-------------|---------------|
//! | Calendar / Day | School year, one entry per date |
//! | DutyCatalog | Fixed list of daily supervision posts |
//! | Roster | Recurring duty sheet per term and weekday |
//! | Staff | Teacher with a 10-period timetable |

mod calendar;
mod duty;
mod roster;
mod staff;

pub use calendar::{
    Calendar, Day, Holiday, Rotation, RotationRule, SchoolYear, Semester, SCHOOL_WEEK, TERMS,
};
pub use duty::{CatalogSlot, Duty, DutyCatalog, DutyGrid, DutyId, DutyTemplate};
pub use roster::{Roster, RosterKey};
pub use staff::{
    classify, course_code, Classification, DutyAssignment, DutyLoad, LoadTier, QuotaPolicy,
    Staff, StaffRole, Timetable, OPTIONAL_PERIODS, PERIODS, PERIODS_PER_SEMESTER,
};
