use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::status::AttendanceStatus;

/// Sparse per-day detail; present only where the user supplied something.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayDetail {
    #[schema(example = "09:30:00", value_type = Option<String>, format = "time", nullable = true)]
    pub in_time: Option<NaiveTime>,

    #[schema(example = "19:00:00", value_type = Option<String>, format = "time", nullable = true)]
    pub out_time: Option<NaiveTime>,

    #[schema(example = "client visit", nullable = true)]
    pub reason: Option<String>,
}

impl DayDetail {
    pub fn is_empty(&self) -> bool {
        self.in_time.is_none() && self.out_time.is_none() && self.reason.is_none()
    }

    /// Field-wise merge; `Some` fields of the patch win, `None` fields keep
    /// the stored value.
    pub fn merge(&mut self, patch: &DayDetail) {
        if patch.in_time.is_some() {
            self.in_time = patch.in_time;
        }
        if patch.out_time.is_some() {
            self.out_time = patch.out_time;
        }
        if patch.reason.is_some() {
            self.reason = patch.reason.clone();
        }
    }
}

/// Overtime constants. One OT day books a fixed block of hours; a recorded
/// out-time past the shift end books the positive differential on P days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvertimePolicy {
    pub shift_end: NaiveTime,
    pub ot_day_hours: f64,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        OvertimePolicy {
            shift_end: NaiveTime::from_hms_opt(17, 30, 0).unwrap_or(NaiveTime::MIN),
            ot_day_hours: 8.0,
        }
    }
}

fn decimal_hours(t: NaiveTime) -> f64 {
    f64::from(t.hour()) + f64::from(t.minute()) / 60.0 + f64::from(t.second()) / 3600.0
}

/// Overtime hours contributed by a single day.
pub fn overtime_hours(
    status: AttendanceStatus,
    detail: Option<&DayDetail>,
    policy: &OvertimePolicy,
) -> f64 {
    match status {
        AttendanceStatus::OT => policy.ot_day_hours,
        AttendanceStatus::P => match detail.and_then(|d| d.out_time) {
            Some(out) => (decimal_hours(out) - decimal_hours(policy.shift_end)).max(0.0),
            None => 0.0,
        },
        _ => 0.0,
    }
}

/// Derived per-status tallies. Counts are days; `overtime` is hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounters {
    pub present: i64,
    pub absent: i64,
    pub privileged_leave: i64,
    pub casual_leave: i64,
    pub sick_leave: i64,
    pub lwp: i64,
    pub half_day: i64,
    pub overtime: f64,
    pub weekly_off: i64,
    pub holiday: i64,
}

impl StatusCounters {
    /// Signed adjustment for one day. Called with -1 for the previous status
    /// and +1 for the new one; `Unset` has no counter and is a no-op.
    pub fn apply(&mut self, status: AttendanceStatus, day_overtime: f64, sign: i64) {
        use AttendanceStatus::*;
        match status {
            P => self.present += sign,
            A => self.absent += sign,
            PL => self.privileged_leave += sign,
            CL => self.casual_leave += sign,
            SL => self.sick_leave += sign,
            LWP => self.lwp += sign,
            HD => self.half_day += sign,
            OT => { /* tallied in hours below */ }
            WO => self.weekly_off += sign,
            H => self.holiday += sign,
            Unset => {}
        }
        self.overtime += day_overtime * sign as f64;
    }

    /// Day count for one status; OT is reported in hours, not here.
    pub fn count_for(&self, status: AttendanceStatus) -> i64 {
        use AttendanceStatus::*;
        match status {
            P => self.present,
            A => self.absent,
            PL => self.privileged_leave,
            CL => self.casual_leave,
            SL => self.sick_leave,
            LWP => self.lwp,
            HD => self.half_day,
            WO => self.weekly_off,
            H => self.holiday,
            OT | Unset => 0,
        }
    }
}

/// One employee's view of the displayed month. `days` covers every date of
/// the month; mutation goes through the grid so counters never drift.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeAttendanceRecord {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(value_type = Object)]
    pub days: BTreeMap<NaiveDate, AttendanceStatus>,

    #[schema(value_type = Object)]
    pub day_details: BTreeMap<NaiveDate, DayDetail>,

    pub counters: StatusCounters,
}

impl EmployeeAttendanceRecord {
    /// Full counter rebuild by scanning `days`. Used after bulk merges where
    /// incremental bookkeeping against unknown prior state would be fragile.
    pub fn recompute_counters(&mut self, policy: &OvertimePolicy) {
        let mut counters = StatusCounters::default();
        for (date, status) in &self.days {
            counters.apply(*status, overtime_hours(*status, self.day_details.get(date), policy), 1);
        }
        self.counters = counters;
    }
}
