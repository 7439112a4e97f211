use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::employee::Employee;
use crate::model::status::AttendanceStatus;

use super::GridError;
use super::calendar::{self, CalendarDay, MonthKey};
use super::record::{DayDetail, EmployeeAttendanceRecord, OvertimePolicy, overtime_hours};

/// Saved per-employee month summary as reported by the attendance store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeMonthSummary {
    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(value_type = Object)]
    pub days: BTreeMap<NaiveDate, SavedDayStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedDayStatus {
    pub status: AttendanceStatus,
}

/// Result of merging saved summaries into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Summaries applied; carries the number of employee records touched.
    Applied(usize),
    /// The summary was for a month the grid no longer displays.
    StaleDiscarded,
}

/// In-memory attendance grid for one displayed month. Records are created
/// fresh on every month change and only mutated through the methods here so
/// the per-status counters always match the `days` maps.
#[derive(Debug, Clone)]
pub struct AttendanceGrid {
    month: MonthKey,
    load_token: String,
    calendar: Vec<CalendarDay>,
    records: BTreeMap<u64, EmployeeAttendanceRecord>,
    policy: OvertimePolicy,
    version: u64,
}

impl AttendanceGrid {
    /// Default-initializes one record per roster employee for every day of
    /// the month. Precedence per cell: holiday > Sunday WO > 2nd/4th Saturday
    /// WO > present. Counters are filled in the same pass.
    pub fn initialize(
        month: MonthKey,
        roster: &[Employee],
        holidays: &HashSet<NaiveDate>,
        policy: OvertimePolicy,
    ) -> Self {
        let calendar = calendar::month_days(month);
        let mut records = BTreeMap::new();

        for employee in roster.iter().filter(|e| e.is_active()) {
            let mut record = EmployeeAttendanceRecord {
                employee_id: employee.id,
                employee_code: employee.employee_code.clone(),
                name: employee.full_name(),
                days: BTreeMap::new(),
                day_details: BTreeMap::new(),
                counters: Default::default(),
            };

            for day in &calendar {
                let status = if holidays.contains(&day.date) {
                    AttendanceStatus::H
                } else if calendar::is_default_off(day.date) {
                    AttendanceStatus::WO
                } else {
                    AttendanceStatus::P
                };
                record.days.insert(day.date, status);
                record
                    .counters
                    .apply(status, overtime_hours(status, None, &policy), 1);
            }

            records.insert(employee.id, record);
        }

        AttendanceGrid {
            month,
            load_token: uuid::Uuid::new_v4().to_string(),
            calendar,
            records,
            policy,
            version: 0,
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn load_token(&self) -> &str {
        &self.load_token
    }

    pub fn calendar(&self) -> &[CalendarDay] {
        &self.calendar
    }

    pub fn records(&self) -> impl Iterator<Item = &EmployeeAttendanceRecord> {
        self.records.values()
    }

    pub fn record(&self, employee_id: u64) -> Option<&EmployeeAttendanceRecord> {
        self.records.get(&employee_id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn policy(&self) -> &OvertimePolicy {
        &self.policy
    }

    /// Single-cell reconciliation. Always decrements the previously stored
    /// status before incrementing the new one, so re-applying the same status
    /// never double-counts.
    pub fn set_status(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
        new_status: AttendanceStatus,
        detail: Option<&DayDetail>,
    ) -> Result<(), GridError> {
        if !self.month.contains(date) {
            return Err(GridError::OutsideMonth(date));
        }
        let record = self
            .records
            .get_mut(&employee_id)
            .ok_or(GridError::UnknownEmployee(employee_id))?;

        let old_status = record.days.get(&date).copied().unwrap_or_default();
        let old_overtime =
            overtime_hours(old_status, record.day_details.get(&date), &self.policy);
        record.counters.apply(old_status, old_overtime, -1);

        if let Some(patch) = detail {
            if !patch.is_empty() {
                record.day_details.entry(date).or_default().merge(patch);
            }
        }

        let new_overtime =
            overtime_hours(new_status, record.day_details.get(&date), &self.policy);
        record.counters.apply(new_status, new_overtime, 1);
        record.days.insert(date, new_status);

        self.version += 1;
        Ok(())
    }

    /// Applies the single-cell update once per date in the inclusive range.
    /// Dates outside the displayed month are silently dropped, never deferred.
    /// Returns how many cells were actually written.
    pub fn apply_range(
        &mut self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
        status: AttendanceStatus,
        detail: Option<&DayDetail>,
    ) -> Result<u32, GridError> {
        if !self.records.contains_key(&employee_id) {
            return Err(GridError::UnknownEmployee(employee_id));
        }
        let mut applied = 0;
        for date in from.iter_days().take_while(|d| *d <= to) {
            if !self.month.contains(date) {
                continue;
            }
            self.set_status(employee_id, date, status, detail)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Bulk merge of server-saved summaries. Overwrites matching `days`
    /// entries and then rebuilds every counter of the touched records from
    /// scratch; the saved state is authoritative, so incremental bookkeeping
    /// against it is deliberately avoided. A summary for a month other than
    /// the one on display is discarded.
    pub fn merge_saved(
        &mut self,
        summary_month: MonthKey,
        summaries: &[EmployeeMonthSummary],
    ) -> MergeOutcome {
        if summary_month != self.month {
            tracing::warn!(
                summary_month = %summary_month,
                displayed_month = %self.month,
                "discarding stale attendance summary"
            );
            return MergeOutcome::StaleDiscarded;
        }

        let mut touched = 0;
        for summary in summaries {
            let Some(record) = self.records.get_mut(&summary.employee_id) else {
                continue;
            };
            for (date, saved) in &summary.days {
                if self.month.contains(*date) {
                    record.days.insert(*date, saved.status);
                }
            }
            record.recompute_counters(&self.policy);
            touched += 1;
        }
        if touched > 0 {
            self.version += 1;
        }
        MergeOutcome::Applied(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use chrono::NaiveTime;

    fn employee(id: u64, code: &str, first: &str) -> Employee {
        Employee {
            id,
            employee_code: code.to_string(),
            first_name: first.to_string(),
            last_name: Some("Tester".to_string()),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            hire_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    fn feb_2024_grid(holidays: &[NaiveDate]) -> AttendanceGrid {
        let roster = vec![employee(1, "EMP-001", "Asha"), employee(7, "EMP-007", "Ravi")];
        AttendanceGrid::initialize(
            MonthKey::parse("2024-02").unwrap(),
            &roster,
            &holidays.iter().copied().collect(),
            OvertimePolicy::default(),
        )
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn initialization_populates_every_day_with_precedence() {
        // Feb 14 is a holiday; Feb 11 is both a Sunday and checked separately.
        let grid = feb_2024_grid(&[date(14)]);
        let record = grid.record(1).unwrap();

        assert_eq!(record.days.len(), 29);
        assert_eq!(record.days[&date(4)], AttendanceStatus::WO); // Sunday
        assert_eq!(record.days[&date(11)], AttendanceStatus::WO); // Sunday
        assert_eq!(record.days[&date(10)], AttendanceStatus::WO); // 2nd Saturday
        assert_eq!(record.days[&date(24)], AttendanceStatus::WO); // 4th Saturday
        assert_eq!(record.days[&date(14)], AttendanceStatus::H);
        assert_eq!(record.days[&date(5)], AttendanceStatus::P);

        // 4 Sundays + 2 off Saturdays, 1 holiday, rest present.
        assert_eq!(record.counters.weekly_off, 6);
        assert_eq!(record.counters.holiday, 1);
        assert_eq!(record.counters.present, 22);
        assert_eq!(record.counters.overtime, 0.0);
    }

    #[test]
    fn holiday_takes_precedence_over_weekly_off() {
        let grid = feb_2024_grid(&[date(10)]); // holiday on the 2nd Saturday
        let record = grid.record(1).unwrap();
        assert_eq!(record.days[&date(10)], AttendanceStatus::H);
        assert_eq!(record.counters.holiday, 1);
        assert_eq!(record.counters.weekly_off, 5);
    }

    #[test]
    fn inactive_employees_are_excluded_from_the_grid() {
        let mut inactive = employee(9, "EMP-009", "Gone");
        inactive.status = EmployeeStatus::Inactive;
        let grid = AttendanceGrid::initialize(
            MonthKey::parse("2024-02").unwrap(),
            &[employee(1, "EMP-001", "Asha"), inactive],
            &HashSet::new(),
            OvertimePolicy::default(),
        );
        assert!(grid.record(1).is_some());
        assert!(grid.record(9).is_none());
    }

    #[test]
    fn counters_track_days_after_arbitrary_status_sequences() {
        let mut grid = feb_2024_grid(&[]);
        grid.set_status(1, date(5), AttendanceStatus::A, None).unwrap();
        grid.set_status(1, date(6), AttendanceStatus::SL, None).unwrap();
        grid.set_status(1, date(6), AttendanceStatus::CL, None).unwrap();
        grid.set_status(1, date(7), AttendanceStatus::A, None).unwrap();
        grid.set_status(1, date(7), AttendanceStatus::P, None).unwrap();

        let record = grid.record(1).unwrap();
        for status in [
            AttendanceStatus::P,
            AttendanceStatus::A,
            AttendanceStatus::CL,
            AttendanceStatus::SL,
            AttendanceStatus::WO,
        ] {
            let in_map = record.days.values().filter(|s| **s == status).count() as i64;
            assert_eq!(record.counters.count_for(status), in_map, "{status}");
        }
        assert_eq!(record.counters.sick_leave, 0);
    }

    #[test]
    fn reapplying_the_same_status_is_idempotent() {
        let mut grid = feb_2024_grid(&[]);
        let detail = DayDetail {
            out_time: NaiveTime::from_hms_opt(19, 0, 0),
            ..DayDetail::default()
        };
        grid.set_status(1, date(5), AttendanceStatus::P, Some(&detail)).unwrap();
        let once = grid.record(1).unwrap().counters.clone();
        grid.set_status(1, date(5), AttendanceStatus::P, Some(&detail)).unwrap();
        assert_eq!(grid.record(1).unwrap().counters, once);
        assert_eq!(once.overtime, 1.5);
    }

    #[test]
    fn ot_status_books_eight_hours_and_unbooks_on_change() {
        let mut grid = feb_2024_grid(&[]);
        grid.set_status(1, date(5), AttendanceStatus::OT, None).unwrap();
        assert_eq!(grid.record(1).unwrap().counters.overtime, 8.0);
        assert_eq!(grid.record(1).unwrap().counters.present, 21);

        grid.set_status(1, date(5), AttendanceStatus::P, None).unwrap();
        assert_eq!(grid.record(1).unwrap().counters.overtime, 0.0);
        assert_eq!(grid.record(1).unwrap().counters.present, 22);
    }

    #[test]
    fn unknown_employee_and_foreign_date_are_rejected() {
        let mut grid = feb_2024_grid(&[]);
        assert_eq!(
            grid.set_status(99, date(5), AttendanceStatus::A, None),
            Err(GridError::UnknownEmployee(99))
        );
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            grid.set_status(1, march, AttendanceStatus::A, None),
            Err(GridError::OutsideMonth(march))
        );
    }

    #[test]
    fn range_fill_clamps_to_the_displayed_month() {
        let mut grid = feb_2024_grid(&[]);
        let applied = grid
            .apply_range(
                1,
                date(27),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                AttendanceStatus::CL,
                None,
            )
            .unwrap();
        assert_eq!(applied, 3); // Feb 27, 28, 29 only
        let record = grid.record(1).unwrap();
        assert_eq!(record.counters.casual_leave, 3);
        assert_eq!(record.days[&date(29)], AttendanceStatus::CL);
    }

    #[test]
    fn bulk_merge_matches_the_incremental_path_on_a_single_change() {
        let mut incremental = feb_2024_grid(&[]);
        incremental.set_status(7, date(5), AttendanceStatus::A, None).unwrap();

        let mut merged = feb_2024_grid(&[]);
        let baseline = merged.record(7).unwrap().counters.clone();
        let summary = EmployeeMonthSummary {
            employee_id: 7,
            days: [(date(5), SavedDayStatus { status: AttendanceStatus::A })]
                .into_iter()
                .collect(),
        };
        let outcome = merged.merge_saved(MonthKey::parse("2024-02").unwrap(), &[summary]);
        assert_eq!(outcome, MergeOutcome::Applied(1));

        let counters = &merged.record(7).unwrap().counters;
        assert_eq!(counters.present, baseline.present - 1);
        assert_eq!(counters.absent, baseline.absent + 1);
        assert_eq!(counters, &incremental.record(7).unwrap().counters);
    }

    #[test]
    fn merge_ignores_unknown_employees_and_keeps_defaults_for_absent_ones() {
        let mut grid = feb_2024_grid(&[]);
        let before = grid.record(1).unwrap().counters.clone();
        let summary = EmployeeMonthSummary {
            employee_id: 4242,
            days: [(date(5), SavedDayStatus { status: AttendanceStatus::A })]
                .into_iter()
                .collect(),
        };
        grid.merge_saved(MonthKey::parse("2024-02").unwrap(), &[summary]);
        assert_eq!(grid.record(1).unwrap().counters, before);
    }

    #[test]
    fn stale_month_summaries_are_discarded() {
        let mut grid = feb_2024_grid(&[]);
        let before = grid.record(1).unwrap().counters.clone();
        let summary = EmployeeMonthSummary {
            employee_id: 1,
            days: [(
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                SavedDayStatus { status: AttendanceStatus::A },
            )]
            .into_iter()
            .collect(),
        };
        let outcome = grid.merge_saved(MonthKey::parse("2024-01").unwrap(), &[summary]);
        assert_eq!(outcome, MergeOutcome::StaleDiscarded);
        assert_eq!(grid.record(1).unwrap().counters, before);
    }
}
