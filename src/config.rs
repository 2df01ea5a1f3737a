//! Engine and plan configuration.
//!
//! Everything has a default, so an empty TOML document is a valid plan:
//! the 2024-2025 school year, the eleven-slot duty catalog, the default
//! period table and quota tables, and a seeded staff shuffle.
//!
//! ```toml
//! [school_year]
//! start = "2024-09-03"
//! end = "2025-06-28"
//! rotation_rule = "school_day_parity"
//!
//! [engine]
//! ordering = { mode = "shuffled", seed = 7 }
//! filler_marker = "Hall"
//!
//! [quota]
//! full = 12
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eligibility::PeriodMap;
use crate::error::Result;
use crate::models::{DutyCatalog, QuotaPolicy, SchoolYear};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Order in which staff are offered duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StaffOrdering {
    /// Keep the input order.
    InputOrder,
    /// Shuffle once per run with a seeded RNG.
    Shuffled {
        /// RNG seed.
        #[serde(default = "default_seed")]
        seed: u64,
    },
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for StaffOrdering {
    fn default() -> Self {
        StaffOrdering::Shuffled { seed: DEFAULT_SEED }
    }
}

/// Allocation engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Staff ordering, shared by every pass.
    pub ordering: StaffOrdering,
    /// Occupants per rotation side in the primary and filler passes.
    pub primary_max_occupants: usize,
    /// Occupants per rotation side in reconciliation.
    pub reconcile_max_occupants: usize,
    /// Duties whose name contains this are filler duties.
    pub filler_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ordering: StaffOrdering::default(),
            primary_max_occupants: 1,
            reconcile_max_occupants: 2,
            filler_marker: "Hall".to_string(),
        }
    }
}

impl EngineConfig {
    /// Sets the staff ordering.
    pub fn with_ordering(mut self, ordering: StaffOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Shuffles staff with `seed`.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_ordering(StaffOrdering::Shuffled { seed })
    }

    /// Sets the filler marker.
    pub fn with_filler_marker(mut self, marker: impl Into<String>) -> Self {
        self.filler_marker = marker.into();
        self
    }

    /// Sets the reconciliation occupancy cap.
    pub fn with_reconcile_max_occupants(mut self, max: usize) -> Self {
        self.reconcile_max_occupants = max;
        self
    }
}

/// Everything a run needs besides staff and holidays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DutyPlanConfig {
    /// School year boundaries and rotation rule.
    pub school_year: SchoolYear,
    /// Engine settings.
    pub engine: EngineConfig,
    /// Quota tables.
    pub quota: QuotaPolicy,
    /// Daily duty catalog.
    pub catalog: DutyCatalog,
    /// Duty slot → timetable period table.
    pub period_map: PeriodMap,
}

impl DutyPlanConfig {
    /// Parses a TOML document and checks the school year.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.school_year.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RotationRule;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_document_is_default() {
        let config = DutyPlanConfig::from_toml_str("").unwrap();
        assert_eq!(config, DutyPlanConfig::default());
        assert_eq!(config.engine.primary_max_occupants, 1);
        assert_eq!(config.engine.reconcile_max_occupants, 2);
        assert_eq!(config.engine.filler_marker, "Hall");
        assert_eq!(config.catalog.slot_count(), 11);
        assert_eq!(config.period_map.len(), 11);
    }

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
[school_year]
start = "2024-09-03"
end = "2024-12-20"
rotation_rule = "school_day_parity"

[engine]
ordering = { mode = "shuffled", seed = 7 }
filler_marker = "Sweep"

[quota]
full = 12
"#;
        let config = DutyPlanConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.school_year.end,
            NaiveDate::from_ymd_opt(2024, 12, 20).unwrap()
        );
        assert_eq!(config.school_year.rotation_rule, RotationRule::SchoolDayParity);
        assert_eq!(config.engine.ordering, StaffOrdering::Shuffled { seed: 7 });
        assert_eq!(config.engine.filler_marker, "Sweep");
        assert_eq!(config.engine.reconcile_max_occupants, 2);
        assert_eq!(config.quota.full, 12);
        assert_eq!(config.quota.guidance, 25);
    }

    #[test]
    fn test_input_order_and_custom_catalog() {
        let toml = r#"
period_map = [{ period = 0 }, { period = 1, adjacent = 2 }]

[engine]
ordering = { mode = "input_order" }

[[catalog.slots]]
label = "Period 1"
duties = [{ name = "Hall - Period 1", room = "Main Hall" }]

[[catalog.slots]]
label = "Lunch"
duties = [
    { name = "Cafeteria - Lunch", room = "Cafeteria" },
    { name = "Hall - Lunch", room = "Main Hall" },
]
"#;
        let config = DutyPlanConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.engine.ordering, StaffOrdering::InputOrder);
        assert_eq!(config.catalog.slot_count(), 2);
        assert_eq!(config.catalog.max_positions(), 2);
        assert_eq!(config.period_map.rule(1).and_then(|r| r.adjacent), Some(2));
    }

    #[test]
    fn test_missing_seed_uses_default() {
        let config = DutyPlanConfig::from_toml_str("[engine]\nordering = { mode = \"shuffled\" }\n")
            .unwrap();
        assert_eq!(
            config.engine.ordering,
            StaffOrdering::Shuffled { seed: DEFAULT_SEED }
        );
    }

    #[test]
    fn test_new_year_needs_new_terms() {
        let stale = "[school_year]\nstart = \"2025-09-02\"\nend = \"2026-06-26\"\n";
        let err = DutyPlanConfig::from_toml_str(stale).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidSchoolYear(_)));

        let toml = r#"
[school_year]
start = "2025-09-02"
end = "2026-06-26"
term_starts = ["2025-09-02", "2025-11-06", "2026-02-02", "2026-04-09"]
rotation_anchors = ["2025-09-01", "2025-11-01", "2026-02-01", "2026-04-01"]
"#;
        let config = DutyPlanConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.school_year.term_of(NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()),
            0
        );
    }

    #[test]
    fn test_bad_document_is_config_error() {
        let err = DutyPlanConfig::from_toml_str("[engine]\nfiller_marker = 3\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
