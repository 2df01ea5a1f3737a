//! Error types for the duty roster engine.
//!
//! Infeasibility (a staff member who cannot be brought to quota) is
//! deliberately absent: it is reported through [`crate::scheduler::DutyReport`],
//! never raised.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type for duty roster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exporting a duty roster.
#[derive(Error, Debug)]
pub enum Error {
    /// School year boundaries are inconsistent.
    #[error("invalid school year: {0}")]
    InvalidSchoolYear(String),

    /// A timetable has more periods than the school day allows.
    #[error("timetable has {len} periods, at most {max} allowed")]
    TimetableLength {
        /// Number of periods supplied.
        len: usize,
        /// Maximum number of periods.
        max: usize,
    },

    /// Committing the assignment would push a staff member past quota.
    #[error("{staff}: assigning weight {weight} on top of {assigned} exceeds quota {quota}")]
    QuotaExceeded {
        /// Staff member name.
        staff: String,
        /// Count already assigned this semester.
        assigned: u32,
        /// Weight of the refused assignment.
        weight: u32,
        /// Semester quota.
        quota: u32,
    },

    /// The staff member already holds this duty.
    #[error("{staff} already holds duty {duty}")]
    DuplicateAssignment {
        /// Staff member name.
        staff: String,
        /// Human-readable duty identifier.
        duty: String,
    },

    /// Input failed structural validation.
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (export targets).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_quota_message() {
        let err = Error::QuotaExceeded {
            staff: "Smith".into(),
            assigned: 12,
            weight: 4,
            quota: 14,
        };
        assert_eq!(
            err.to_string(),
            "Smith: assigning weight 4 on top of 12 exceeds quota 14"
        );
    }

    #[test]
    fn test_validation_message_joins_problems() {
        let err = Error::Validation(vec![
            ValidationError::new(ValidationErrorKind::DuplicateStaff, "Duplicate staff name: A"),
            ValidationError::new(ValidationErrorKind::EmptyStaffName, "Staff #2 has no name"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid input: Duplicate staff name: A; Staff #2 has no name"
        );
    }
}
