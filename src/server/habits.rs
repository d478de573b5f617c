use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::core::{date, streak};
use crate::server::AppState;
use crate::server::dto::{
    CreateHabitRequest, HabitDetail, HabitStats, HabitSummary, UpdateHabitRequest,
};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_goal_days, validate_habit_name};
use crate::store::Store;
use crate::types::Habit;

use super::{calendar, logs};

pub fn habit_router() -> Router<Arc<AppState>> {
    Router::new()
        // Habits
        .route("/habits", get(list_habits))
        .route("/habits", post(create_habit))
        .route("/habits/{id}", get(get_habit))
        .route("/habits/{id}", patch(update_habit))
        .route("/habits/{id}", delete(archive_habit))
        // Completion logs
        .route("/habits/{id}/logs", post(logs::mark_done))
        .route("/habits/{id}/logs/{date}", delete(logs::undo_done))
        // Calendar views
        .route("/habits/{id}/calendar/week", get(calendar::week_view))
        .route("/habits/{id}/calendar/month", get(calendar::month_view))
        .route("/habits/{id}/calendar/year", get(calendar::year_view))
}

/// Loads a habit owned by `user_id`. Archived habits and habits owned by
/// someone else both come back as 404 so ids never leak across accounts.
pub(super) fn fetch_active_habit(
    store: &dyn Store,
    id: &str,
    user_id: &str,
) -> Result<Habit, ApiError> {
    let habit = store
        .get_habit(id, user_id)
        .api_err("Failed to get habit")?
        .or_not_found("Habit not found")?;

    if habit.is_archived() {
        return Err(ApiError::not_found("Habit not found"));
    }

    Ok(habit)
}

/// Completion dates for a habit, bounded below by its start date.
pub(super) fn log_dates(store: &dyn Store, habit: &Habit) -> Result<BTreeSet<NaiveDate>, ApiError> {
    Ok(store
        .list_log_dates(&habit.id, &habit.user_id, habit.start_date)
        .api_err("Failed to list logs")?
        .into_iter()
        .collect())
}

fn habit_stats(habit: &Habit, done: &BTreeSet<NaiveDate>, today: NaiveDate) -> HabitStats {
    let start = Some(habit.start_date);
    let current_streak = streak::current_streak(done, today, start);

    HabitStats {
        today,
        current_streak,
        best_streak: streak::best_streak(done),
        last_7_days: streak::completion_rate(done, today, 7, start),
        last_30_days: streak::completion_rate(done, today, 30, start),
        missed_days: streak::consecutive_missed_days(done, today, start),
        done_today: done.contains(&today),
        goal_progress_percent: streak::goal_progress_percent(current_streak, habit.goal_days),
    }
}

pub async fn list_habits(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let today = date::today_in_tz(state.timezone);

    let habits = store
        .list_active_habits(&auth.user.id)
        .api_err("Failed to list habits")?;

    // One log query for the whole dashboard, bounded by the earliest start.
    let earliest_start = habits
        .iter()
        .map(|habit| habit.start_date)
        .min()
        .unwrap_or(today);
    let logs = store
        .list_user_log_dates(&auth.user.id, earliest_start)
        .api_err("Failed to list logs")?;

    let mut dates_by_habit: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
    for (habit_id, log_date) in logs {
        dates_by_habit.entry(habit_id).or_default().insert(log_date);
    }

    let summaries: Vec<HabitSummary> = habits
        .into_iter()
        .map(|habit| {
            let done = dates_by_habit.remove(&habit.id).unwrap_or_default();
            let start = Some(habit.start_date);
            let current_streak = streak::current_streak(&done, today, start);

            HabitSummary {
                current_streak,
                missed_days: streak::consecutive_missed_days(&done, today, start),
                done_today: done.contains(&today),
                goal_progress_percent: streak::goal_progress_percent(
                    current_streak,
                    habit.goal_days,
                ),
                habit,
            }
        })
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(summaries)))
}

pub async fn create_habit(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateHabitRequest>,
) -> impl IntoResponse {
    validate_habit_name(&req.name)?;
    validate_goal_days(req.goal_days)?;

    let now = Utc::now();
    let habit = Habit {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user.id.clone(),
        name: req.name.trim().to_string(),
        goal_days: req.goal_days,
        start_date: req.start_date,
        archived_at: None,
        created_at: now,
        updated_at: now,
    };

    state
        .store
        .create_habit(&habit)
        .api_err("Failed to create habit")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(habit))))
}

pub async fn get_habit(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let habit = fetch_active_habit(store, &id, &auth.user.id)?;
    let done = log_dates(store, &habit)?;
    let today = date::today_in_tz(state.timezone);

    let stats = habit_stats(&habit, &done, today);

    Ok::<_, ApiError>(Json(ApiResponse::success(HabitDetail { habit, stats })))
}

pub async fn update_habit(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateHabitRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let mut habit = fetch_active_habit(store, &id, &auth.user.id)?;

    if let Some(name) = req.name {
        validate_habit_name(&name)?;
        habit.name = name.trim().to_string();
    }
    if let Some(goal_days) = req.goal_days {
        validate_goal_days(goal_days)?;
        habit.goal_days = goal_days;
    }
    if let Some(start_date) = req.start_date {
        habit.start_date = start_date;
    }
    habit.updated_at = Utc::now();

    store
        .update_habit(&habit)
        .api_err("Failed to update habit")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(habit)))
}

pub async fn archive_habit(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let archived = state
        .store
        .archive_habit(&id, &auth.user.id, Utc::now())
        .api_err("Failed to archive habit")?;

    if !archived {
        return Err(ApiError::not_found("Habit not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
