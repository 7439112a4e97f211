pub mod calendar;
pub mod persist;
pub mod record;
pub mod store;

use chrono::NaiveDate;
use derive_more::Display;

/// Failures of the in-memory grid. Everything else (network, store) fails at
/// the HTTP boundary, not here.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum GridError {
    #[display(fmt = "no attendance grid is open")]
    NoGridOpen,
    #[display(fmt = "unknown employee: {}", _0)]
    UnknownEmployee(u64),
    #[display(fmt = "date {} is outside the displayed month", _0)]
    OutsideMonth(NaiveDate),
    #[display(fmt = "invalid month key: {}", _0)]
    BadMonthKey(String),
    #[display(fmt = "no attendance records to save")]
    EmptySubmission,
}

impl std::error::Error for GridError {}
