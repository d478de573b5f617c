//! Pure date arithmetic and derived habit statistics.
//!
//! Nothing in this module touches the store or the clock except
//! [`date::today_in_tz`], which reads the current instant. Handlers fetch log
//! rows, build a `BTreeSet<NaiveDate>`, and hand it to these functions.

pub mod calendar;
pub mod date;
pub mod streak;
