use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::date::{date_range, month_shape};

/// One renderable day cell.
///
/// `active` means the date falls inside the habit's tracked span
/// (start date through today); `missed` marks an active past day with no
/// completion log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub day: u32,
    pub date: NaiveDate,
    pub done: bool,
    pub missed: bool,
    pub active: bool,
}

/// One cell per day of the given month. `month` is 1-indexed; callers
/// supply a valid year/month pair.
pub fn month_cells(
    year: i32,
    month: u32,
    today: NaiveDate,
    start: NaiveDate,
    done: &BTreeSet<NaiveDate>,
) -> Vec<CalendarCell> {
    let shape = month_shape(year, month);
    (1..=shape.days_in_month)
        .map(|day| {
            let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid year/month");
            cell(date, today, start, done)
        })
        .collect()
}

/// Cells for the trailing 7-day range ending at `today`.
pub fn trailing_week(
    today: NaiveDate,
    start: NaiveDate,
    done: &BTreeSet<NaiveDate>,
) -> Vec<CalendarCell> {
    date_range(today, 7)
        .into_iter()
        .map(|date| cell(date, today, start, done))
        .collect()
}

fn cell(date: NaiveDate, today: NaiveDate, start: NaiveDate, done: &BTreeSet<NaiveDate>) -> CalendarCell {
    let is_done = done.contains(&date);
    let active = date >= start && date <= today;
    CalendarCell {
        day: date.day(),
        date,
        done: is_done,
        missed: active && date < today && !is_done,
        active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn set(dates: &[&str]) -> BTreeSet<NaiveDate> {
        dates.iter().map(|s| d(s)).collect()
    }

    #[test]
    fn test_month_cells_cover_whole_month() {
        let cells = month_cells(2024, 2, d("2024-02-15"), d("2024-02-01"), &set(&[]));
        assert_eq!(cells.len(), 29);
        assert_eq!(cells[0].day, 1);
        assert_eq!(cells[28].date, d("2024-02-29"));
    }

    #[test]
    fn test_cell_flags() {
        let done = set(&["2024-02-10"]);
        let cells = month_cells(2024, 2, d("2024-02-15"), d("2024-02-08"), &done);

        // Before the start date: inactive, never missed.
        assert!(!cells[5].active);
        assert!(!cells[5].missed);

        // Done day.
        assert!(cells[9].done);
        assert!(cells[9].active);
        assert!(!cells[9].missed);

        // Active past day without a log.
        assert!(cells[10].missed);

        // Today is never missed, even when not done.
        assert!(cells[14].active);
        assert!(!cells[14].missed);

        // Future days are inactive.
        assert!(!cells[15].active);
        assert!(!cells[15].missed);
    }

    #[test]
    fn test_trailing_week_ends_today() {
        let done = set(&["2024-01-09", "2024-01-10"]);
        let cells = trailing_week(d("2024-01-10"), d("2024-01-01"), &done);
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0].date, d("2024-01-04"));
        assert_eq!(cells[6].date, d("2024-01-10"));
        assert!(cells[5].done && cells[6].done);
        assert!(cells[4].missed);
    }
}
