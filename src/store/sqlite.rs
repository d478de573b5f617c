use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| {
        tracing::error!("Invalid date in database: '{}' - {}", s, e);
        Utc::now().date_naive()
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        updated_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        user_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        expires_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_datetime(&s)),
        last_used_at: row
            .get::<_, Option<String>>(6)?
            .map(|s| parse_datetime(&s)),
    })
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        goal_days: row.get(3)?,
        start_date: parse_date(&row.get::<_, String>(4)?),
        archived_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_datetime(&s)),
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";
const SESSION_COLUMNS: &str =
    "id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at";
const HABIT_COLUMNS: &str =
    "id, user_id, name, goal_days, start_date, archived_at, created_at, updated_at";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id,
                    user.email,
                    user.password_hash,
                    format_datetime(&user.created_at),
                    format_datetime(&user.updated_at),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyExists
                } else {
                    Error::from(e)
                }
            })?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Session operations

    fn create_session(&self, session: &Session) -> Result<()> {
        self.conn().execute(
            "INSERT INTO sessions (id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.token_hash,
                session.token_lookup,
                session.user_id,
                format_datetime(&session.created_at),
                session.expires_at.as_ref().map(format_datetime),
                session.last_used_at.as_ref().map(format_datetime),
            ],
        )?;
        Ok(())
    }

    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE token_lookup = ?1"),
            params![lookup],
            session_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_session(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_session_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE sessions SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Habit operations

    fn create_habit(&self, habit: &Habit) -> Result<()> {
        self.conn().execute(
            "INSERT INTO habits (id, user_id, name, goal_days, start_date, archived_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.id,
                habit.user_id,
                habit.name,
                habit.goal_days,
                format_date(habit.start_date),
                habit.archived_at.as_ref().map(format_datetime),
                format_datetime(&habit.created_at),
                format_datetime(&habit.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_habit(&self, id: &str, user_id: &str) -> Result<Option<Habit>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id],
            habit_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_active_habits(&self, user_id: &str) -> Result<Vec<Habit>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits
             WHERE user_id = ?1 AND archived_at IS NULL
             ORDER BY name ASC"
        ))?;

        let rows = stmt.query_map(params![user_id], habit_from_row)?;
        let mut habits = Vec::new();
        for habit in rows {
            habits.push(habit?);
        }
        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> Result<()> {
        self.conn().execute(
            "UPDATE habits SET name = ?1, goal_days = ?2, start_date = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                habit.name,
                habit.goal_days,
                format_date(habit.start_date),
                format_datetime(&habit.updated_at),
                habit.id,
                habit.user_id,
            ],
        )?;
        Ok(())
    }

    fn archive_habit(&self, id: &str, user_id: &str, archived_at: DateTime<Utc>) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE habits SET archived_at = ?1, updated_at = ?1
             WHERE id = ?2 AND user_id = ?3 AND archived_at IS NULL",
            params![format_datetime(&archived_at), id, user_id],
        )?;
        Ok(rows > 0)
    }

    // Log operations

    fn upsert_log(&self, log: &HabitLog) -> Result<()> {
        self.conn().execute(
            "INSERT INTO habit_logs (habit_id, user_id, log_date, done, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (habit_id, user_id, log_date) DO UPDATE SET
                done = excluded.done",
            params![
                log.habit_id,
                log.user_id,
                format_date(log.log_date),
                log.done,
                format_datetime(&log.created_at),
            ],
        )?;
        Ok(())
    }

    fn delete_log(&self, habit_id: &str, user_id: &str, date: NaiveDate) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1 AND user_id = ?2 AND log_date = ?3",
            params![habit_id, user_id, format_date(date)],
        )?;
        Ok(rows > 0)
    }

    fn list_log_dates(
        &self,
        habit_id: &str,
        user_id: &str,
        from: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT log_date FROM habit_logs
             WHERE habit_id = ?1 AND user_id = ?2 AND log_date >= ?3
             ORDER BY log_date ASC",
        )?;

        let rows = stmt.query_map(params![habit_id, user_id, format_date(from)], |row| {
            Ok(parse_date(&row.get::<_, String>(0)?))
        })?;
        let mut dates = Vec::new();
        for date in rows {
            dates.push(date?);
        }
        Ok(dates)
    }

    fn list_user_log_dates(
        &self,
        user_id: &str,
        from: NaiveDate,
    ) -> Result<Vec<(String, NaiveDate)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT habit_id, log_date FROM habit_logs
             WHERE user_id = ?1 AND log_date >= ?2
             ORDER BY log_date ASC",
        )?;

        let rows = stmt.query_map(params![user_id, format_date(from)], |row| {
            Ok((row.get(0)?, parse_date(&row.get::<_, String>(1)?)))
        })?;
        let mut pairs = Vec::new();
        for pair in rows {
            pairs.push(pair?);
        }
        Ok(pairs)
    }
}
