use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::date::{add_days, date_range, diff_in_days};

/// Completed/total counts over a trailing window, with a rounded percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionRate {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
}

/// Consecutive done-days ending at `reference`, walking backward day by day.
///
/// Stops at the first absent day, or before `start` if given. A gap breaks
/// the streak; missing days are never skipped. 0 if `reference` itself is
/// absent.
pub fn current_streak(
    done: &BTreeSet<NaiveDate>,
    reference: NaiveDate,
    start: Option<NaiveDate>,
) -> u32 {
    let mut streak = 0;
    let mut cursor = reference;

    loop {
        if start.is_some_and(|s| cursor < s) {
            break;
        }
        if !done.contains(&cursor) {
            break;
        }
        streak += 1;
        cursor = add_days(cursor, -1);
    }

    streak
}

/// Longest run of consecutive dates anywhere in the set.
///
/// Considers all recorded history; a habit's start date does not bound this
/// statistic, unlike every other one here.
pub fn best_streak(done: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in done {
        run = match prev {
            Some(p) if diff_in_days(p, date) == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }

    best
}

/// Completion rate over the trailing window of `window_days` dates ending at
/// `reference`, counting only dates on or after `start` if given.
pub fn completion_rate(
    done: &BTreeSet<NaiveDate>,
    reference: NaiveDate,
    window_days: i64,
    start: Option<NaiveDate>,
) -> CompletionRate {
    let window: Vec<NaiveDate> = date_range(reference, window_days)
        .into_iter()
        .filter(|date| start.map_or(true, |s| *date >= s))
        .collect();

    let completed = window.iter().filter(|date| done.contains(date)).count() as u32;
    let total = window.len() as u32;

    CompletionRate {
        completed,
        total,
        percent: percent_of(completed, total),
    }
}

/// Consecutive absent days strictly before `reference`, bounded below by
/// `start`. 0 whenever `reference` itself is done.
pub fn consecutive_missed_days(
    done: &BTreeSet<NaiveDate>,
    reference: NaiveDate,
    start: Option<NaiveDate>,
) -> u32 {
    if done.contains(&reference) {
        return 0;
    }
    // Without a lower bound an all-absent walk would never terminate.
    if start.is_none() && done.is_empty() {
        return 0;
    }

    let mut missed = 0;
    let mut cursor = add_days(reference, -1);

    loop {
        if start.is_some_and(|s| cursor < s) {
            break;
        }
        if done.contains(&cursor) {
            break;
        }
        missed += 1;
        cursor = add_days(cursor, -1);
    }

    missed
}

/// Percent of the goal covered by the current streak, capped at 100.
pub fn goal_progress_percent(current_streak: u32, goal_days: i64) -> u32 {
    if goal_days < 1 {
        return 0;
    }
    let percent = (i64::from(current_streak) * 100 + goal_days / 2) / goal_days;
    percent.min(100) as u32
}

/// Rounded half away from zero; inputs here are never negative.
fn percent_of(completed: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (completed * 100 + total / 2) / total
    }
}
