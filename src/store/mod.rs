mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // Session operations
    fn create_session(&self, session: &Session) -> Result<()>;
    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>>;
    fn delete_session(&self, id: &str) -> Result<bool>;
    fn update_session_last_used(&self, id: &str) -> Result<()>;

    // Habit operations
    fn create_habit(&self, habit: &Habit) -> Result<()>;
    fn get_habit(&self, id: &str, user_id: &str) -> Result<Option<Habit>>;
    fn list_active_habits(&self, user_id: &str) -> Result<Vec<Habit>>;
    fn update_habit(&self, habit: &Habit) -> Result<()>;
    fn archive_habit(&self, id: &str, user_id: &str, archived_at: DateTime<Utc>) -> Result<bool>;

    // Log operations
    fn upsert_log(&self, log: &HabitLog) -> Result<()>;
    fn delete_log(&self, habit_id: &str, user_id: &str, date: NaiveDate) -> Result<bool>;
    /// Log dates for one habit, on or after `from`.
    fn list_log_dates(&self, habit_id: &str, user_id: &str, from: NaiveDate)
    -> Result<Vec<NaiveDate>>;
    /// (habit id, log date) pairs across all of a user's habits, on or
    /// after `from`. Callers group these into per-habit date sets.
    fn list_user_log_dates(&self, user_id: &str, from: NaiveDate)
    -> Result<Vec<(String, NaiveDate)>>;
}
