use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireUser;
use crate::core::date;
use crate::server::AppState;
use crate::server::dto::MarkDoneRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::parse_date_param;
use crate::types::HabitLog;

use super::habits::fetch_active_habit;

pub async fn mark_done(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MarkDoneRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let habit = fetch_active_habit(store, &id, &auth.user.id)?;

    let today = date::today_in_tz(state.timezone);
    let log_date = req.date.unwrap_or(today);

    if log_date > today {
        return Err(ApiError::bad_request("Cannot mark a date in the future"));
    }

    // Upsert: re-marking an already-done day is idempotent.
    let log = HabitLog {
        habit_id: habit.id,
        user_id: auth.user.id.clone(),
        log_date,
        done: true,
        created_at: Utc::now(),
    };
    store.upsert_log(&log).api_err("Failed to record completion")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(log))))
}

pub async fn undo_done(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, date)): Path<(String, String)>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let habit = fetch_active_habit(store, &id, &auth.user.id)?;
    let log_date = parse_date_param(&date)?;

    let deleted = store
        .delete_log(&habit.id, &auth.user.id, log_date)
        .api_err("Failed to delete completion")?;

    if !deleted {
        return Err(ApiError::not_found("No completion recorded for that date"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
