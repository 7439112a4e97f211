use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::status::AttendanceStatus;

use super::GridError;
use super::record::overtime_hours;
use super::store::{AttendanceGrid, EmployeeMonthSummary, SavedDayStatus};

/// One flat attendance row as submitted to / returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatAttendanceRecord {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "2024-02-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = 1.5)]
    pub overtime_hours: f64,

    pub is_weekly_off: bool,

    #[schema(example = "09:30", nullable = true)]
    pub in_time: Option<String>,

    #[schema(example = "19:00", nullable = true)]
    pub out_time: Option<String>,
}

/// Accepts `HH:MM` (what the grid UI sends) or `HH:MM:SS`.
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Flattens the whole grid into submission rows, skipping unset cells.
/// An empty result is rejected here, before anything reaches the store; a
/// zero-record submission would otherwise wipe the month.
pub fn flatten(grid: &AttendanceGrid) -> Result<Vec<FlatAttendanceRecord>, GridError> {
    let policy = *grid.policy();
    let mut rows = Vec::new();

    for record in grid.records() {
        for (date, status) in &record.days {
            if *status == AttendanceStatus::Unset {
                continue;
            }
            let detail = record.day_details.get(date);
            rows.push(FlatAttendanceRecord {
                employee_id: record.employee_id,
                date: *date,
                status: *status,
                overtime_hours: overtime_hours(*status, detail, &policy),
                is_weekly_off: *status == AttendanceStatus::WO,
                in_time: detail.and_then(|d| d.in_time).map(format_hhmm),
                out_time: detail.and_then(|d| d.out_time).map(format_hhmm),
            });
        }
    }

    if rows.is_empty() {
        return Err(GridError::EmptySubmission);
    }
    Ok(rows)
}

/// Folds flat saved rows back into per-employee month summaries, the shape
/// the load endpoint reports and the grid merges.
pub fn summarize(rows: &[FlatAttendanceRecord]) -> Vec<EmployeeMonthSummary> {
    let mut by_employee: BTreeMap<u64, BTreeMap<NaiveDate, SavedDayStatus>> = BTreeMap::new();
    for row in rows {
        by_employee
            .entry(row.employee_id)
            .or_default()
            .insert(row.date, SavedDayStatus { status: row.status });
    }
    by_employee
        .into_iter()
        .map(|(employee_id, days)| EmployeeMonthSummary { employee_id, days })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::calendar::MonthKey;
    use crate::grid::record::{DayDetail, OvertimePolicy};
    use crate::model::employee::{Employee, EmployeeStatus};
    use chrono::Datelike;
    use std::collections::HashSet;

    fn roster() -> Vec<Employee> {
        (1..=3)
            .map(|id| Employee {
                id,
                employee_code: format!("EMP-{id:03}"),
                first_name: format!("Emp{id}"),
                last_name: None,
                email: format!("emp{id}@example.com"),
                phone: None,
                hire_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                status: EmployeeStatus::Active,
            })
            .collect()
    }

    fn grid() -> AttendanceGrid {
        AttendanceGrid::initialize(
            MonthKey::parse("2024-02").unwrap(),
            &roster(),
            &HashSet::new(),
            OvertimePolicy::default(),
        )
    }

    #[test]
    fn default_grid_flattens_to_employees_times_days() {
        let rows = flatten(&grid()).unwrap();
        assert_eq!(rows.len(), 3 * 29);
        assert!(rows.iter().all(|r| r.status != AttendanceStatus::Unset));
        // The empty-submission guard can only fire on a grid with no records
        // at all; default initialization always produces a full month.
        let weekly_off = rows.iter().filter(|r| r.is_weekly_off).count();
        assert_eq!(weekly_off, 3 * 6);
    }

    #[test]
    fn empty_grid_submission_is_rejected_locally() {
        let empty = AttendanceGrid::initialize(
            MonthKey::parse("2024-02").unwrap(),
            &[],
            &HashSet::new(),
            OvertimePolicy::default(),
        );
        assert_eq!(flatten(&empty), Err(GridError::EmptySubmission));
    }

    #[test]
    fn flatten_carries_overtime_and_times() {
        let mut g = grid();
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let detail = DayDetail {
            in_time: parse_hhmm("09:30"),
            out_time: parse_hhmm("19:00"),
            reason: None,
        };
        g.set_status(1, date, AttendanceStatus::P, Some(&detail)).unwrap();
        g.set_status(
            1,
            NaiveDate::from_ymd_opt(2024, 2, 6).unwrap(),
            AttendanceStatus::OT,
            None,
        )
        .unwrap();

        let rows = flatten(&g).unwrap();
        let edited = rows
            .iter()
            .find(|r| r.employee_id == 1 && r.date == date)
            .unwrap();
        assert_eq!(edited.overtime_hours, 1.5);
        assert_eq!(edited.in_time.as_deref(), Some("09:30"));
        assert_eq!(edited.out_time.as_deref(), Some("19:00"));

        let ot_row = rows
            .iter()
            .find(|r| r.employee_id == 1 && r.date.day() == 6)
            .unwrap();
        assert_eq!(ot_row.overtime_hours, 8.0);
    }

    #[test]
    fn summarize_groups_rows_per_employee() {
        let rows = flatten(&grid()).unwrap();
        let summaries = summarize(&rows);
        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|s| s.days.len() == 29));
        assert_eq!(summaries[0].employee_id, 1);
    }

    #[test]
    fn times_parse_with_and_without_seconds() {
        assert_eq!(
            parse_hhmm("19:00"),
            NaiveTime::from_hms_opt(19, 0, 0)
        );
        assert_eq!(
            parse_hhmm("09:15:30"),
            NaiveTime::from_hms_opt(9, 15, 30)
        );
        assert_eq!(parse_hhmm("7pm"), None);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let row = FlatAttendanceRecord {
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            status: AttendanceStatus::P,
            overtime_hours: 1.5,
            is_weekly_off: false,
            in_time: None,
            out_time: Some("19:00".to_string()),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["employeeId"], 1);
        assert_eq!(value["overtimeHours"], 1.5);
        assert_eq!(value["isWeeklyOff"], false);
        assert_eq!(value["outTime"], "19:00");
    }
}
