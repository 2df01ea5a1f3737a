//! Greedy duty allocation and roster reporting.
//!
//! # Algorithm
//!
//! `DutyAssigner` collapses the school year into recurring day patterns
//! and fills each pattern's duties once, charging the pattern weight
//! against staff quotas. It is a greedy heuristic with no optimality
//! guarantee.
//!
//! # Phases
//!
//! `BUILD_PATTERNS → ASSIGN_PRIMARY → ASSIGN_FILLER → RECONCILE → DONE`,
//! tracked as [`Phase`] on the [`EngineContext`].
//!
//! # Report
//!
//! `DutyReport` summarises coverage and per-staff quota use.

mod context;
mod engine;
mod patterns;
mod report;

pub use context::{EngineContext, Phase};
pub use engine::DutyAssigner;
pub use patterns::{PatternKey, PatternTable};
pub use report::{DutyReport, StaffSummary, UnfilledDuty};
