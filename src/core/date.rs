use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Current calendar date rendered in the given zone.
///
/// Two calls within the same wall-clock day in that zone return the same
/// date regardless of the host's local zone.
pub fn today_in_tz(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Shifts a date by `n` calendar days. `n` may be negative or zero.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date + Duration::days(n)
}

/// Signed number of calendar days from `from` to `to`, positive if `to` is
/// later.
pub fn diff_in_days(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// `n` consecutive dates ending at and including `end`, oldest first.
/// `n <= 0` yields an empty vec.
pub fn date_range(end: NaiveDate, n: i64) -> Vec<NaiveDate> {
    (0..n.max(0)).rev().map(|i| add_days(end, -i)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthShape {
    pub year: i32,
    /// 1-indexed.
    pub month: u32,
    pub days_in_month: u32,
    /// Weekday of day 1, 0 = Sunday .. 6 = Saturday.
    pub first_weekday: u32,
}

/// Shape of a calendar month. `month` is 1-indexed; callers supply a valid
/// year/month pair.
pub fn month_shape(year: i32, month: u32) -> MonthShape {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year/month");
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid year/month");

    MonthShape {
        year,
        month,
        days_in_month: diff_in_days(first, next_first) as u32,
        first_weekday: first.weekday().num_days_from_sunday(),
    }
}
