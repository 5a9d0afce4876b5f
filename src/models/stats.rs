//! Derived habit statistics.
//!
//! None of these are persisted: they are recomputed from the completion set
//! on every request so they can never go stale.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Streak state for a single habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakInfo {
    /// Consecutive satisfied periods ending at the current or previous period
    pub current_streak: u32,
    /// Longest run of consecutive satisfied periods ever observed
    pub longest_streak: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Whether the current period is already satisfied
    pub is_completed_today: bool,
}

/// Per-habit statistics for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitStats {
    // ─── Totals ──────────────────────────────────────────────────
    pub total_completions: u32,
    /// Percent (0-100) of satisfied periods over the recent window
    pub completion_rate: u32,

    // ─── Streaks ─────────────────────────────────────────────────
    pub current_streak: u32,
    pub longest_streak: u32,

    // ─── Time Series ─────────────────────────────────────────────
    /// Completions per day for the last 7 days, oldest first
    pub weekly_progress: Vec<u32>,
    /// Completions per 7-day block for the last 4 blocks, oldest first
    pub monthly_progress: Vec<u32>,
}

/// Aggregates across all of a user's habits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    /// All habits, archived included
    pub total_habits: u32,
    pub active_habits: u32,
    /// Active habits already satisfied for their current period
    pub completed_today: u32,
    /// Best current streak among active habits
    pub overall_streak: u32,
    /// Percent (0-100), averaged over active habits
    pub weekly_completion_rate: u32,
}
