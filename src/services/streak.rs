// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion & streak engine.
//!
//! Completions are bucketed into periods (day, ISO week or calendar month,
//! all in UTC). A period is "satisfied" once it holds the required number of
//! completions. Streaks are runs of consecutive satisfied periods.
//!
//! The current streak tolerates an unsatisfied current period: if the
//! previous period is satisfied the streak is still alive and counts back
//! from there. Missing both the current and the previous period resets it.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Frequency, Period, StreakInfo};

/// Errors from building a cadence rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreakError {
    #[error("target count must be at least 1, got {0}")]
    InvalidTargetCount(u32),
}

/// Cadence of a habit reduced to what the streak engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRule {
    period: Period,
    required: u32,
}

impl StreakRule {
    /// Build a rule from a habit's cadence.
    ///
    /// `DAILY`, `WEEKLY` and `MONTHLY` need one completion per day, week or
    /// month. `CUSTOM` needs `target_count` completions per `target_period`.
    /// The target count is validated for every cadence.
    pub fn new(
        frequency: Frequency,
        target_count: u32,
        target_period: Period,
    ) -> Result<Self, StreakError> {
        if target_count == 0 {
            return Err(StreakError::InvalidTargetCount(target_count));
        }

        let (period, required) = match frequency {
            Frequency::Daily => (Period::Day, 1),
            Frequency::Weekly => (Period::Week, 1),
            Frequency::Monthly => (Period::Month, 1),
            Frequency::Custom => (target_period, target_count),
        };

        Ok(Self { period, required })
    }

    /// Ordinal of the period containing `date`. Adjacent periods differ by 1.
    pub fn period_index(&self, date: NaiveDate) -> i64 {
        period_index(self.period, date)
    }

    /// Indices of every satisfied period in the completion history.
    pub fn satisfied_periods(&self, completions: &[DateTime<Utc>]) -> BTreeSet<i64> {
        let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
        for completed_at in completions {
            *counts
                .entry(self.period_index(completed_at.date_naive()))
                .or_insert(0) += 1;
        }

        counts
            .into_iter()
            .filter(|&(_, count)| count >= self.required)
            .map(|(index, _)| index)
            .collect()
    }

    /// Compute streak state as of `now`.
    pub fn evaluate(&self, completions: &[DateTime<Utc>], now: DateTime<Utc>) -> StreakInfo {
        let satisfied = self.satisfied_periods(completions);
        let current = self.period_index(now.date_naive());
        let is_completed_today = satisfied.contains(&current);

        let anchor = if is_completed_today {
            Some(current)
        } else if satisfied.contains(&(current - 1)) {
            Some(current - 1)
        } else {
            None
        };

        let current_streak = anchor
            .map(|start| {
                (0i64..)
                    .take_while(|offset| satisfied.contains(&(start - offset)))
                    .count() as u32
            })
            .unwrap_or(0);

        StreakInfo {
            current_streak,
            longest_streak: longest_run(&satisfied),
            last_completed_at: completions.iter().max().copied(),
            is_completed_today,
        }
    }
}

/// Ordinal of the period containing `date`.
///
/// Days count from the common era, weeks count Mondays (0001-01-01 was a
/// Monday), months count `year * 12 + month0`.
pub fn period_index(period: Period, date: NaiveDate) -> i64 {
    match period {
        Period::Day => i64::from(date.num_days_from_ce()),
        Period::Week => {
            let monday = i64::from(date.num_days_from_ce())
                - i64::from(date.weekday().num_days_from_monday());
            monday.div_euclid(7)
        }
        Period::Month => i64::from(date.year()) * 12 + i64::from(date.month0()),
    }
}

fn longest_run(satisfied: &BTreeSet<i64>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<i64> = None;

    for &index in satisfied {
        run = match previous {
            Some(prev) if index == prev + 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(index);
    }

    longest
}
