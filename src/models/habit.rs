// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::services::streak::{StreakError, StreakRule};
use crate::time_utils::format_utc_rfc3339;

pub const DEFAULT_ICON: &str = "sparkles";
pub const DEFAULT_COLOR: &str = "#a855f7";

/// How often a habit is expected to be performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// Time bucket a target count is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

/// Stored habit record in Firestore (document ID = `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    /// Built-in or custom category, if any
    pub category_id: Option<String>,
    pub frequency: Frequency,
    pub target_count: u32,
    pub target_period: Period,
    /// Archived habits are hidden from listings but keep their history
    pub archived: bool,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Cadence rule used for streak and statistics computation.
    pub fn streak_rule(&self) -> Result<StreakRule, StreakError> {
        StreakRule::new(self.frequency, self.target_count, self.target_period)
    }
}

/// Habit as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub category_id: Option<String>,
    pub frequency: Frequency,
    pub target_count: u32,
    pub target_period: Period,
    pub archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Habit> for HabitResponse {
    fn from(habit: Habit) -> Self {
        Self {
            id: habit.id,
            user_id: habit.user_id,
            name: habit.name,
            description: habit.description,
            icon: habit.icon,
            color: habit.color,
            category_id: habit.category_id,
            frequency: habit.frequency,
            target_count: habit.target_count,
            target_period: habit.target_period,
            archived: habit.archived,
            created_at: format_utc_rfc3339(habit.created_at),
            updated_at: format_utc_rfc3339(habit.updated_at),
        }
    }
}
