//! School duty roster engine.
//!
//! Allocates recurring supervision duties (halls, cafeteria, library,
//! DDC) to teaching staff across a school year. The engine respects each
//! person's timetable, a Day-1/Day-2 rotation, term boundaries and a
//! per-semester fairness quota.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Calendar`, `Day`, `Holiday`, `SchoolYear`,
//!   `DutyCatalog`, `Duty`, `Roster`, `Staff`, `Timetable`, `QuotaPolicy`
//! - **`eligibility`**: Duty slot → timetable period table and the
//!   `eligible` predicate
//! - **`scheduler`**: `DutyAssigner` (greedy allocation), `EngineContext`,
//!   `PatternTable`, `DutyReport`
//! - **`validation`**: Input integrity checks (duplicate staff, inverted
//!   holidays, unmapped duty slots)
//! - **`config`**: Engine settings and TOML-loadable plans
//! - **`export`**: CSV writers for the roster and staff summary
//!
//! # Example
//!
//! ```
//! use duty_roster::models::{Holiday, Staff};
//! use duty_roster::scheduler::{DutyAssigner, EngineContext};
//! use duty_roster::DutyPlanConfig;
//!
//! let config = DutyPlanConfig::default();
//! let holidays = vec![Holiday::new(
//!     "Winter Break",
//!     chrono::NaiveDate::from_ymd_opt(2024, 12, 23).unwrap(),
//!     chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
//! )];
//! let staff = vec![
//!     Staff::new("Smith", ["ENG1D", "", "MTH1W", "SCI1D", "", "ENG2D", "", "HIS2D", "CHC2D", ""])
//!         .unwrap(),
//! ];
//!
//! let mut ctx = EngineContext::from_config(config, holidays, staff).unwrap();
//! let report = DutyAssigner::new().run(&mut ctx);
//! assert!(report.staff[0].assigned[0] <= ctx.staff()[0].quota());
//! ```

pub mod config;
pub mod eligibility;
pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{DutyPlanConfig, EngineConfig, StaffOrdering};
pub use eligibility::{eligible, PeriodMap, SlotRule};
pub use error::{Error, Result};
pub use validation::{validate_input, ValidationError, ValidationErrorKind};
