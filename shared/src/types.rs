//! Common types used across the platform

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Format of a month key, e.g. `2024-03`
pub const MONTH_KEY_FORMAT: &str = "%Y-%m";

/// Date range for queries (inclusive on both ends)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered by the range
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Month key (`yyyy-MM`) of a date
pub fn month_key(date: NaiveDate) -> String {
    date.format(MONTH_KEY_FORMAT).to_string()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Shift a date back by whole calendar months, clamping to the month's last day
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Parse a `yyyy-MM` key back into the first day of that month
pub fn parse_month_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d").ok()
}
