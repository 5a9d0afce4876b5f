// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Affirmation history model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::ai::Provenance;

/// Stored affirmation, written when one is generated for a known user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affirmation {
    pub id: String,
    pub user_id: String,
    pub content: String,
    /// Whether the text came from the model or the static pool
    pub source: Provenance,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}
