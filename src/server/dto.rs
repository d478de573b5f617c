use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::calendar::CalendarCell;
use crate::core::streak::CompletionRate;
use crate::types::{Habit, User};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login. The raw token is shown exactly once.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub goal_days: i64,
    pub start_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHabitRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub goal_days: Option<i64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkDoneRequest {
    /// Defaults to "today" in the configured zone.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Dashboard row: a habit plus the stats the list view renders.
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    #[serde(flatten)]
    pub habit: Habit,
    pub current_streak: u32,
    pub missed_days: u32,
    pub done_today: bool,
    pub goal_progress_percent: u32,
}

#[derive(Debug, Serialize)]
pub struct HabitStats {
    pub today: NaiveDate,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_7_days: CompletionRate,
    pub last_30_days: CompletionRate,
    pub missed_days: u32,
    pub done_today: bool,
    pub goal_progress_percent: u32,
}

#[derive(Debug, Serialize)]
pub struct HabitDetail {
    #[serde(flatten)]
    pub habit: Habit,
    pub stats: HabitStats,
}

#[derive(Debug, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Weekday of day 1, 0 = Sunday .. 6 = Saturday.
    pub first_weekday: u32,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Serialize)]
pub struct WeekView {
    pub today: NaiveDate,
    pub days: Vec<CalendarCell>,
}

#[derive(Debug, Serialize)]
pub struct YearView {
    pub year: i32,
    pub months: Vec<MonthView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YearParams {
    #[serde(default)]
    pub year: Option<i32>,
}
