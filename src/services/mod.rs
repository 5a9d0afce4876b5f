// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod ai;
pub mod fallback;
pub mod ollama;
pub mod stats;
pub mod streak;

pub use ai::{AiContentService, Generated, Provenance};
pub use ollama::{OllamaClient, OllamaError};
pub use streak::{StreakError, StreakRule};
