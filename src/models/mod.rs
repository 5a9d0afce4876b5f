// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod affirmation;
pub mod category;
pub mod completion;
pub mod habit;
pub mod stats;

pub use affirmation::Affirmation;
pub use category::Category;
pub use completion::{Completion, CompletionResponse};
pub use habit::{Frequency, Habit, HabitResponse, Period};
pub use stats::{DashboardStats, HabitStats, StreakInfo};
