// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion model: one "mark complete" action on a habit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::format_utc_rfc3339;

/// Stored completion record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    /// Owning habit
    pub habit_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Completion as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompletionResponse {
    pub id: String,
    pub habit_id: String,
    pub completed_at: String,
    pub note: Option<String>,
}

impl From<Completion> for CompletionResponse {
    fn from(completion: Completion) -> Self {
        Self {
            id: completion.id,
            habit_id: completion.habit_id,
            completed_at: format_utc_rfc3339(completion.completed_at),
            note: completion.note,
        }
    }
}
