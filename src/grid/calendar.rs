use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::GridError;

const WEEKDAY_ABBREV: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One displayed month, parsed from a `YYYY-MM` key. Month is held zero-based
/// internally; the wire format stays 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    year: i32,
    month0: u32,
    first: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
        Some(MonthKey { year, month0, first })
    }

    pub fn parse(key: &str) -> Result<Self, GridError> {
        let bad = || GridError::BadMonthKey(key.to_string());
        let (y, m) = key.split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        if !(1..=12).contains(&month) {
            return Err(bad());
        }
        MonthKey::new(year, month - 1).ok_or_else(bad)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Native calendar rollover: day before the 1st of the next month.
    pub fn last_day(&self) -> NaiveDate {
        let (ny, nm0) = if self.month0 == 11 {
            (self.year + 1, 0)
        } else {
            (self.year, self.month0 + 1)
        };
        // Both months were validated at construction.
        NaiveDate::from_ymd_opt(ny, nm0 + 1, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.first)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    #[schema(example = 5)]
    pub day: u32,

    #[schema(example = "2024-02-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Mon")]
    pub weekday: String,

    /// Zero-based, Sunday = 0.
    #[schema(example = 1)]
    pub weekday_no: u32,

    /// 1-based week of month: `ceil((day + first_weekday_offset) / 7)`.
    #[schema(example = 2)]
    pub week_of_month: u32,

    pub is_sunday: bool,
    pub is_saturday: bool,
    pub is_today: bool,
}

/// Ordered list of calendar days for one month, annotated for grid rendering.
pub fn month_days(month: MonthKey) -> Vec<CalendarDay> {
    let today = Local::now().date_naive();
    let first_offset = month.first_day().weekday().num_days_from_sunday();
    let total = month.days_in_month();

    (1..=total)
        .filter_map(|day| {
            let date = NaiveDate::from_ymd_opt(month.year(), month.month0() + 1, day)?;
            let weekday_no = date.weekday().num_days_from_sunday();
            Some(CalendarDay {
                day,
                date,
                weekday: WEEKDAY_ABBREV[weekday_no as usize].to_string(),
                weekday_no,
                week_of_month: (day + first_offset).div_ceil(7),
                is_sunday: weekday_no == 0,
                is_saturday: weekday_no == 6,
                is_today: date == today,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeekBucket {
    #[schema(example = 2)]
    pub week: u32,
    pub days: Vec<CalendarDay>,
}

/// Groups days by week-of-month for week-spanning header rendering.
pub fn week_buckets(days: &[CalendarDay]) -> Vec<WeekBucket> {
    let mut buckets: Vec<WeekBucket> = Vec::new();
    for day in days {
        match buckets.last_mut() {
            Some(bucket) if bucket.week == day.week_of_month => bucket.days.push(day.clone()),
            _ => buckets.push(WeekBucket {
                week: day.week_of_month,
                days: vec![day.clone()],
            }),
        }
    }
    buckets
}

/// Ordinal of a Saturday within its month (1st Saturday = 1).
fn saturday_ordinal(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Default weekly-off rule: every Sunday plus the 2nd and 4th Saturday.
pub fn is_default_off(date: NaiveDate) -> bool {
    let weekday_no = date.weekday().num_days_from_sunday();
    if weekday_no == 0 {
        return true;
    }
    weekday_no == 6 && matches!(saturday_ordinal(date), 2 | 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_month_keys() {
        let month = MonthKey::parse("2024-02").unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month0(), 1);
        assert_eq!(month.to_string(), "2024-02");

        assert!(MonthKey::parse("2024-13").is_err());
        assert!(MonthKey::parse("2024").is_err());
        assert!(MonthKey::parse("feb-2024").is_err());
    }

    #[test]
    fn leap_february_has_29_days() {
        let month = MonthKey::parse("2024-02").unwrap();
        assert_eq!(month.days_in_month(), 29);
        assert_eq!(month_days(month).len(), 29);

        let plain = MonthKey::parse("2023-02").unwrap();
        assert_eq!(plain.days_in_month(), 28);
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let month = MonthKey::parse("2024-12").unwrap();
        assert_eq!(month.days_in_month(), 31);
        assert_eq!(
            month.last_day(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn week_of_month_counts_from_first_weekday_offset() {
        // Feb 2024 starts on a Thursday (offset 4).
        let days = month_days(MonthKey::parse("2024-02").unwrap());
        assert_eq!(days[0].week_of_month, 1); // Thu Feb 1
        assert_eq!(days[2].week_of_month, 1); // Sat Feb 3
        assert_eq!(days[3].week_of_month, 2); // Sun Feb 4
        assert_eq!(days[28].week_of_month, 5); // Thu Feb 29

        let buckets = week_buckets(&days);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].days.len(), 3);
        assert_eq!(buckets[1].days.len(), 7);
    }

    #[test]
    fn default_off_covers_sundays_and_second_fourth_saturdays() {
        let date = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        assert!(is_default_off(date(4))); // Sunday
        assert!(is_default_off(date(11))); // Sunday
        assert!(is_default_off(date(10))); // 2nd Saturday
        assert!(is_default_off(date(24))); // 4th Saturday
        assert!(!is_default_off(date(3))); // 1st Saturday
        assert!(!is_default_off(date(17))); // 3rd Saturday
        assert!(!is_default_off(date(5))); // Monday
    }

    #[test]
    fn out_of_month_dates_are_not_contained() {
        let month = MonthKey::parse("2024-02").unwrap();
        assert!(month.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2023, 2, 5).unwrap()));
    }
}
