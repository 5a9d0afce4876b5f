// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit Tracker: habits, completions and streaks with AI-assisted content
//!
//! This crate provides the backend API for tracking recurring habits,
//! computing streaks and statistics, and generating affirmations and
//! suggestions through a local language model with static fallbacks.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::AiContentService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub ai: AiContentService,
}
