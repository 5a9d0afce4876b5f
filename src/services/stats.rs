// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion-rate and progress statistics built on the streak engine.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{DashboardStats, Habit, HabitStats};
use crate::services::streak::StreakRule;

/// Window (in days, today included) for a habit's completion rate.
pub const COMPLETION_RATE_WINDOW_DAYS: i64 = 30;
/// Window (in days, today included) for the dashboard weekly rate.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;
const MONTHLY_BLOCKS: usize = 4;

/// Percent (0-100) of the rule's periods between `from` and `to` (inclusive)
/// that are satisfied.
pub fn completion_rate(
    rule: &StreakRule,
    completions: &[DateTime<Utc>],
    from: NaiveDate,
    to: NaiveDate,
) -> u32 {
    if from > to {
        return 0;
    }

    let first = rule.period_index(from);
    let last = rule.period_index(to);
    let total = last - first + 1;
    let satisfied = rule.satisfied_periods(completions);
    let hit = satisfied.range(first..=last).count();

    ((hit as f64 / total as f64) * 100.0).round() as u32
}

/// Completion counts per day for the `days` days ending at `end`, oldest first.
pub fn daily_counts(completions: &[DateTime<Utc>], end: NaiveDate, days: usize) -> Vec<u32> {
    block_counts(completions, end, days, 1)
}

/// Completion counts per block of `block_days` days, for `blocks` blocks
/// ending at `end` (inclusive), oldest first.
pub fn block_counts(
    completions: &[DateTime<Utc>],
    end: NaiveDate,
    blocks: usize,
    block_days: i64,
) -> Vec<u32> {
    let mut counts = vec![0u32; blocks];
    let span = blocks as i64 * block_days;

    for completed_at in completions {
        let age = (end - completed_at.date_naive()).num_days();
        if !(0..span).contains(&age) {
            continue;
        }
        let block = (age / block_days) as usize;
        counts[blocks - 1 - block] += 1;
    }

    counts
}

/// Start of a rate window: `window_days` back from `today`, but never before
/// the habit existed.
fn window_start(habit: &Habit, today: NaiveDate, window_days: i64) -> NaiveDate {
    let start = today - Duration::days(window_days - 1);
    start.max(habit.created_at.date_naive())
}

/// Statistics for one habit as of `now`.
pub fn habit_stats(
    habit: &Habit,
    rule: &StreakRule,
    completions: &[DateTime<Utc>],
    now: DateTime<Utc>,
) -> HabitStats {
    let today = now.date_naive();
    let streak = rule.evaluate(completions, now);

    HabitStats {
        total_completions: completions.len() as u32,
        completion_rate: completion_rate(
            rule,
            completions,
            window_start(habit, today, COMPLETION_RATE_WINDOW_DAYS),
            today,
        ),
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        weekly_progress: daily_counts(completions, today, 7),
        monthly_progress: block_counts(completions, today, MONTHLY_BLOCKS, 7),
    }
}

/// Aggregate statistics across a user's habits (archived ones included in
/// `habits`; they only count towards `total_habits`).
///
/// Habits whose stored cadence is invalid are skipped.
pub fn dashboard_stats(
    habits: &[(Habit, Vec<DateTime<Utc>>)],
    now: DateTime<Utc>,
) -> DashboardStats {
    let today = now.date_naive();
    let mut stats = DashboardStats {
        total_habits: habits.len() as u32,
        ..DashboardStats::default()
    };
    let mut rate_sum = 0u32;

    for (habit, completions) in habits.iter().filter(|(h, _)| !h.archived) {
        let rule = match habit.streak_rule() {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!(habit_id = %habit.id, error = %e, "Skipping habit with invalid cadence");
                continue;
            }
        };

        let streak = rule.evaluate(completions, now);
        stats.active_habits += 1;
        if streak.is_completed_today {
            stats.completed_today += 1;
        }
        stats.overall_streak = stats.overall_streak.max(streak.current_streak);
        rate_sum += completion_rate(
            &rule,
            completions,
            window_start(habit, today, WEEKLY_WINDOW_DAYS),
            today,
        );
    }

    if stats.active_habits > 0 {
        stats.weekly_completion_rate =
            (f64::from(rate_sum) / f64::from(stats.active_habits)).round() as u32;
    }

    stats
}
