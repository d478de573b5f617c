use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{Datelike, NaiveDate};

use crate::auth::RequireUser;
use crate::core::{calendar, date};
use crate::server::AppState;
use crate::server::dto::{MonthParams, MonthView, WeekView, YearParams, YearView};
use crate::server::response::{ApiError, ApiResponse};
use crate::server::validation::{validate_month, validate_year};
use crate::types::Habit;

use super::habits::{fetch_active_habit, log_dates};

pub async fn week_view(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let habit = fetch_active_habit(store, &id, &auth.user.id)?;
    let done = log_dates(store, &habit)?;
    let today = date::today_in_tz(state.timezone);

    Ok::<_, ApiError>(Json(ApiResponse::success(WeekView {
        today,
        days: calendar::trailing_week(today, habit.start_date, &done),
    })))
}

pub async fn month_view(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<MonthParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let habit = fetch_active_habit(store, &id, &auth.user.id)?;
    let done = log_dates(store, &habit)?;
    let today = date::today_in_tz(state.timezone);

    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month());
    validate_year(year)?;
    validate_month(month)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(build_month_view(
        year, month, today, &habit, &done,
    ))))
}

pub async fn year_view(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<YearParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let habit = fetch_active_habit(store, &id, &auth.user.id)?;
    let done = log_dates(store, &habit)?;
    let today = date::today_in_tz(state.timezone);

    let year = params.year.unwrap_or_else(|| today.year());
    validate_year(year)?;

    let months = (1..=12)
        .map(|month| build_month_view(year, month, today, &habit, &done))
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(YearView { year, months })))
}

fn build_month_view(
    year: i32,
    month: u32,
    today: NaiveDate,
    habit: &Habit,
    done: &BTreeSet<NaiveDate>,
) -> MonthView {
    let shape = date::month_shape(year, month);
    MonthView {
        year,
        month,
        first_weekday: shape.first_weekday,
        cells: calendar::month_cells(year, month, today, habit.start_date, done),
    }
}
