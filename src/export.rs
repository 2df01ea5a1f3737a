//! CSV export of the roster and the per-staff summary.
//!
//! Writers take any [`std::io::Write`]; the crate never picks a file
//! location. Occupant names within a cell are joined with `"; "`.

use std::io::Write;

use csv::WriterBuilder;

use crate::error::Result;
use crate::models::Rotation;
use crate::scheduler::{DutyReport, EngineContext};

const NAME_SEPARATOR: &str = "; ";

/// Writes one row per duty per (term, weekday) that has school days.
///
/// Columns: `Term, Day, Duty, Day1 Occupants, Day2 Occupants`.
pub fn write_roster_csv<W: Write>(ctx: &EngineContext, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["Term", "Day", "Duty", "Day1 Occupants", "Day2 Occupants"])?;

    let mut rows = 0usize;
    for (key, grid) in ctx.roster().iter() {
        if ctx.patterns().roster_weight(*key) == 0 {
            continue;
        }
        let term = (key.term + 1).to_string();
        let day = key.weekday.to_string();
        for (_, _, duty) in grid.duties() {
            let day1 = join(duty.occupants(Rotation::Day1));
            let day2 = join(duty.occupants(Rotation::Day2));
            wtr.write_record([
                term.as_str(),
                day.as_str(),
                duty.name.as_str(),
                day1.as_str(),
                day2.as_str(),
            ])?;
            rows += 1;
        }
    }

    wtr.flush()?;
    log::debug!("wrote {rows} roster rows");
    Ok(())
}

/// Writes one row per staff member.
///
/// Columns: `Name, Role, Load, Quota, Semester 1, Semester 2`.
pub fn write_staff_csv<W: Write>(report: &DutyReport, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["Name", "Role", "Load", "Quota", "Semester 1", "Semester 2"])?;

    for s in &report.staff {
        wtr.write_record([
            s.name.clone(),
            s.role.to_string(),
            s.tier.to_string(),
            s.quota.to_string(),
            s.assigned[0].to_string(),
            s.assigned[1].to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, StaffOrdering};
    use crate::eligibility::{PeriodMap, SlotRule};
    use crate::models::{Calendar, CatalogSlot, DutyCatalog, SchoolYear, Staff, Timetable};
    use crate::scheduler::DutyAssigner;
    use chrono::NaiveDate;

    fn run() -> (EngineContext, DutyReport) {
        let year = SchoolYear::new(
            NaiveDate::from_ymd_opt(2024, 9, 9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 10).unwrap(),
        );
        let calendar = Calendar::initialize_year(year, vec![]).unwrap();
        let catalog =
            DutyCatalog::new().with_slot(CatalogSlot::new("Lunch").with_duty("Cafeteria - Lunch", "Cafeteria"));
        let map = PeriodMap::new(vec![SlotRule::period(1)]);
        let staff = vec![
            Staff::with_timetable("Adams", Timetable::free()).with_quota(1),
            Staff::with_timetable("Baker", Timetable::free()).with_quota(1),
            Staff::with_timetable("Clark", Timetable::free()).with_quota(1),
        ];
        let mut ctx = EngineContext::new(
            calendar,
            staff,
            catalog,
            map,
            EngineConfig::default().with_ordering(StaffOrdering::InputOrder),
        )
        .unwrap();
        let report = DutyAssigner::new().run(&mut ctx);
        (ctx, report)
    }

    #[test]
    fn test_roster_csv() {
        let (ctx, _) = run();
        let mut buf = Vec::new();
        write_roster_csv(&ctx, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Term,Day,Duty,Day1 Occupants,Day2 Occupants");
        // Monday is Day 1, Tuesday Day 2; Clark doubles up on Monday.
        assert_eq!(lines[1], "1,Mon,Cafeteria - Lunch,Adams; Clark,");
        assert_eq!(lines[2], "1,Tue,Cafeteria - Lunch,,Baker");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_staff_csv() {
        let (_, report) = run();
        let mut buf = Vec::new();
        write_staff_csv(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Name,Role,Load,Quota,Semester 1,Semester 2");
        assert_eq!(lines[1], "Adams,Regular,0/6,1,1,0");
        assert_eq!(lines.len(), 4);
    }
}
