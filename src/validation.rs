//! Input validation for duty roster runs.
//!
//! Checks structural integrity of the staff list, holiday records, duty
//! catalog and period table before the engine is built. Detects:
//! - Duplicate or empty staff names
//! - Holiday records that end before they start
//! - Catalog slots with no period mapping
//! - Period mappings outside the semester
//!
//! Every problem is collected; nothing stops at the first one.

use std::collections::HashSet;

use crate::eligibility::PeriodMap;
use crate::models::{DutyCatalog, Holiday, Staff, PERIODS_PER_SEMESTER};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two staff members share a name.
    DuplicateStaff,
    /// A staff member has a blank name.
    EmptyStaffName,
    /// A holiday ends before it starts.
    InvertedHoliday,
    /// A catalog slot has no entry in the period map.
    UnmappedDutySlot,
    /// A period map entry lies outside the semester.
    PeriodOutOfRange,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the inputs of a duty roster run.
///
/// Checks:
/// 1. Staff names are non-empty and unique
/// 2. Holiday records do not end before they start
/// 3. Every catalog slot has a period mapping
/// 4. Every mapped period (and lunch neighbour) is within the semester
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    staff: &[Staff],
    holidays: &[Holiday],
    catalog: &DutyCatalog,
    period_map: &PeriodMap,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for (i, s) in staff.iter().enumerate() {
        if s.name().trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyStaffName,
                format!("Staff #{} has no name", i + 1),
            ));
        } else if !names.insert(s.name()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStaff,
                format!("Duplicate staff name: {}", s.name()),
            ));
        }
    }

    for h in holidays {
        if h.end < h.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedHoliday,
                format!("Holiday '{}' ends {} before it starts {}", h.summary, h.end, h.start),
            ));
        }
    }

    for (slot, cs) in catalog.slots.iter().enumerate() {
        if period_map.rule(slot).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnmappedDutySlot,
                format!("Duty slot {} ('{}') has no period mapping", slot + 1, cs.label),
            ));
        }
    }

    for (slot, rule) in period_map.rules().iter().enumerate() {
        let out_of_range = rule
            .adjacent
            .into_iter()
            .chain(std::iter::once(rule.period))
            .filter(|&p| p >= PERIODS_PER_SEMESTER);
        for period in out_of_range {
            errors.push(ValidationError::new(
                ValidationErrorKind::PeriodOutOfRange,
                format!(
                    "Duty slot {} maps to period {}, outside 0..{}",
                    slot + 1,
                    period,
                    PERIODS_PER_SEMESTER
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
