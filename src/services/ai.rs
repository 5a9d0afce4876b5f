// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI content service.
//!
//! Every use case follows the same protocol:
//! 1. Probe the model server (best effort, never errors)
//! 2. If reachable, make one bounded generation call
//! 3. Parse the response into the expected shape
//! 4. On any failure along the way, return deterministic fallback content
//!
//! Callers always get a payload, tagged with where it came from.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::category::{
    builtin_category, builtin_category_ids, is_builtin_category, other_category, Category,
    OTHER_CATEGORY_ID,
};
use crate::services::fallback::{self, MAX_SUGGESTIONS};
use crate::services::ollama::{GenerateOptions, OllamaClient};

/// Where a piece of generated content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Provenance {
    Ai,
    Fallback,
}

/// Content plus its provenance tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    pub content: T,
    pub source: Provenance,
}

impl<T> Generated<T> {
    fn ai(content: T) -> Self {
        Self {
            content,
            source: Provenance::Ai,
        }
    }

    fn fallback(content: T) -> Self {
        Self {
            content,
            source: Provenance::Fallback,
        }
    }
}

const AFFIRMATION_TEMPERATURE: f32 = 0.8;
const CATEGORY_TEMPERATURE: f32 = 0.3;
const SUGGESTION_TEMPERATURE: f32 = 0.7;
const TIPS_TEMPERATURE: f32 = 0.6;
/// A category id is a single short token.
const CATEGORY_MAX_TOKENS: u32 = 10;

/// Generates affirmations, category and habit suggestions, and tips.
#[derive(Debug, Clone)]
pub struct AiContentService {
    client: OllamaClient,
}

impl AiContentService {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    /// A short daily affirmation, optionally tailored to `context`.
    pub async fn affirmation(&self, context: Option<&str>) -> Generated<String> {
        let prompt = affirmation_prompt(context);
        let options = GenerateOptions::with_temperature(AFFIRMATION_TEMPERATURE);

        match self
            .generate_with("affirmation", &prompt, options, parse_affirmation)
            .await
        {
            Some(text) => Generated::ai(text),
            None => Generated::fallback(fallback::affirmation().to_string()),
        }
    }

    /// The built-in category that best fits a habit.
    pub async fn suggest_category(
        &self,
        habit_name: &str,
        description: Option<&str>,
    ) -> Generated<Category> {
        let prompt = category_prompt(habit_name, description);
        let options = GenerateOptions {
            temperature: CATEGORY_TEMPERATURE,
            max_tokens: Some(CATEGORY_MAX_TOKENS),
        };

        let generated = match self
            .generate_with("suggest_category", &prompt, options, parse_category_id)
            .await
        {
            Some(id) => Generated::ai(id),
            None => Generated::fallback(fallback::suggest_category(habit_name, description).to_string()),
        };

        Generated {
            content: builtin_category(&generated.content).unwrap_or_else(other_category),
            source: generated.source,
        }
    }

    /// Up to three habits that complement `existing_habits`.
    ///
    /// The model is only consulted when there is at least one existing habit
    /// to build on.
    pub async fn suggest_habits(
        &self,
        existing_habits: &[String],
        category: Option<&str>,
    ) -> Generated<Vec<String>> {
        if !existing_habits.is_empty() {
            let prompt = suggestions_prompt(existing_habits, category);
            let options = GenerateOptions::with_temperature(SUGGESTION_TEMPERATURE);

            if let Some(suggestions) = self
                .generate_with("suggest_habits", &prompt, options, parse_suggestions)
                .await
            {
                return Generated::ai(suggestions);
            }
        }

        Generated::fallback(fallback::suggest_habits(category, existing_habits))
    }

    /// Up to three practical tips for keeping up a habit.
    pub async fn habit_tips(&self, habit_name: &str) -> Generated<Vec<String>> {
        let prompt = tips_prompt(habit_name);
        let options = GenerateOptions::with_temperature(TIPS_TEMPERATURE);

        match self
            .generate_with("habit_tips", &prompt, options, parse_tips)
            .await
        {
            Some(tips) => Generated::ai(tips),
            None => Generated::fallback(fallback::habit_tips(habit_name)),
        }
    }

    /// Probe, generate once, parse. `None` means "use the fallback".
    async fn generate_with<T>(
        &self,
        use_case: &'static str,
        prompt: &str,
        options: GenerateOptions,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Option<T> {
        if !self.client.is_available().await {
            tracing::info!(use_case, "Ollama unavailable, using fallback content");
            return None;
        }

        match self.client.generate(prompt, options).await {
            Ok(text) => {
                let parsed = parse(&text);
                if parsed.is_none() {
                    tracing::warn!(
                        use_case,
                        response_len = text.len(),
                        "Unusable Ollama response, using fallback content"
                    );
                }
                parsed
            }
            Err(e) => {
                tracing::warn!(use_case, error = %e, "Ollama generation failed, using fallback content");
                None
            }
        }
    }
}

// ─── Prompts ─────────────────────────────────────────────────

fn affirmation_prompt(context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "Generate a short, personalized daily affirmation (1-2 sentences) for someone who is \
             working on: {}. Make it encouraging and specific. Only output the affirmation, no \
             quotes or attribution.",
            context
        ),
        None => "Generate a short, inspiring daily affirmation (1-2 sentences) about personal \
                 growth and building good habits. Make it warm and encouraging. Only output the \
                 affirmation, no quotes or attribution."
            .to_string(),
    }
}

fn category_prompt(habit_name: &str, description: Option<&str>) -> String {
    let ids: Vec<&str> = builtin_category_ids().collect();
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| format!("\nDescription: {}", d))
        .unwrap_or_default();

    format!(
        "Classify this habit into exactly one category.\nHabit: {}{}\n\nCategories: {}\n\n\
         Respond with only the category id in lowercase, nothing else.",
        habit_name,
        description,
        ids.join(", ")
    )
}

fn suggestions_prompt(existing_habits: &[String], category: Option<&str>) -> String {
    let focus = category
        .map(|c| format!(" Focus on the \"{}\" category.", c))
        .unwrap_or_default();

    format!(
        "Based on these existing habits: {}\n\nSuggest 3 complementary habits that would pair \
         well.{} Format as a JSON array of strings, like: [\"habit1\", \"habit2\", \"habit3\"]\n\
         Only output the JSON array, nothing else.",
        existing_habits.join(", "),
        focus
    )
}

fn tips_prompt(habit_name: &str) -> String {
    format!(
        "Give 3 practical tips for maintaining the habit: \"{}\".\nKeep each tip concise (1 \
         sentence). Format as a numbered list.\nOnly output the tips, nothing else.",
        habit_name
    )
}

// ─── Response Parsing ────────────────────────────────────────

fn strip_quotes(text: &str) -> &str {
    text.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .trim()
}

fn parse_affirmation(text: &str) -> Option<String> {
    let cleaned = strip_quotes(text);
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// The first token of the response, validated against the built-in ids.
/// Anything unknown becomes `other`; an empty response is unusable.
fn parse_category_id(text: &str) -> Option<String> {
    let token = text
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_lowercase();

    if token.is_empty() {
        return None;
    }

    if is_builtin_category(&token) {
        Some(token)
    } else {
        tracing::debug!(token = %token, "Model suggested unknown category");
        Some(OTHER_CATEGORY_ID.to_string())
    }
}

/// A JSON array of strings, or failing that any double-quoted substrings.
fn parse_suggestions(text: &str) -> Option<Vec<String>> {
    let candidates = serde_json::from_str::<Vec<String>>(text.trim())
        .unwrap_or_else(|_| extract_quoted(text));

    let suggestions: Vec<String> = candidates
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();

    (!suggestions.is_empty()).then_some(suggestions)
}

/// Contents of every closed `"..."` pair in `text`.
fn extract_quoted(text: &str) -> Vec<String> {
    let segments: Vec<&str> = text.split('"').collect();

    segments
        .iter()
        .enumerate()
        // odd segments sit between quotes; the last one is unterminated
        .filter(|(i, s)| i % 2 == 1 && *i + 1 < segments.len() && !s.is_empty())
        .map(|(_, s)| s.to_string())
        .collect()
}

/// Lines of a numbered or bulleted list, markers removed.
fn parse_tips(text: &str) -> Option<Vec<String>> {
    let tips: Vec<String> = text
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')', '-', '*', '•'])
                .trim()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect();

    (!tips.is_empty()).then_some(tips)
}
