// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deterministic content used whenever the language model is unavailable
//! or returns something unusable.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::category::OTHER_CATEGORY_ID;

/// Maximum number of habit suggestions or tips returned.
pub const MAX_SUGGESTIONS: usize = 3;

const AFFIRMATIONS: &[&str] = &[
    "Every small step you take today builds the foundation for tomorrow's success.",
    "Your consistency is creating lasting change. Keep going!",
    "You are capable of achieving anything you set your mind to.",
    "Today is another opportunity to become the best version of yourself.",
    "Your dedication to growth inspires those around you.",
    "Progress, not perfection, is the key to lasting change.",
    "Each day is a fresh start to build the life you want.",
    "Your habits shape your future. Choose them wisely.",
    "Believe in your ability to grow and improve every day.",
    "Small daily improvements lead to remarkable results over time.",
];

/// Keyword table for category matching. Order matters: the first category
/// with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("health", &["health", "doctor", "medicine", "vitamin", "checkup"]),
    (
        "fitness",
        &["exercise", "workout", "gym", "run", "walk", "sport", "training", "stretch"],
    ),
    (
        "nutrition",
        &["eat", "food", "diet", "water", "drink", "meal", "vegetable", "fruit", "calories"],
    ),
    ("sleep", &["sleep", "bed", "wake", "morning", "night", "rest", "nap"]),
    (
        "mindfulness",
        &["meditat", "mindful", "breath", "calm", "stress", "relax", "peace"],
    ),
    ("wellness", &["wellness", "self-care", "spa", "mental", "therapy"]),
    (
        "learning",
        &["read", "book", "learn", "study", "course", "skill", "language", "practice"],
    ),
    (
        "productivity",
        &["work", "task", "project", "plan", "organize", "focus", "email", "meeting"],
    ),
    (
        "creativity",
        &["art", "paint", "draw", "music", "write", "creative", "design", "craft"],
    ),
    (
        "social",
        &["friend", "family", "call", "meet", "social", "connect", "relationship"],
    ),
    (
        "finance",
        &["money", "save", "budget", "invest", "finance", "expense", "income"],
    ),
];

const SUGGESTIONS: &[(&str, &[&str])] = &[
    (
        "health",
        &[
            "Drink 8 glasses of water daily",
            "Take a 10-minute walk after lunch",
            "Practice deep breathing for 5 minutes",
            "Stretch for 10 minutes in the morning",
            "Get 7-8 hours of sleep",
        ],
    ),
    (
        "productivity",
        &[
            "Plan your day the night before",
            "Use the Pomodoro technique",
            "Review your goals weekly",
            "Limit social media to 30 minutes",
            "Practice single-tasking",
        ],
    ),
    (
        "wellness",
        &[
            "Meditate for 10 minutes daily",
            "Write 3 gratitude items each day",
            "Spend 15 minutes in nature",
            "Practice journaling",
            "Digital detox before bed",
        ],
    ),
    (
        "learning",
        &[
            "Read 20 pages of a book",
            "Learn 5 new vocabulary words",
            "Watch an educational video",
            "Practice a new skill for 30 minutes",
            "Listen to a podcast during commute",
        ],
    ),
];

const DEFAULT_SUGGESTIONS: &[&str] = &[
    "Morning meditation",
    "Evening journaling",
    "Daily exercise",
    "Reading habit",
    "Gratitude practice",
];

/// Pick an affirmation from the fixed pool.
pub fn affirmation() -> &'static str {
    affirmation_with(&mut rand::thread_rng())
}

/// Pick an affirmation using the given random source.
pub fn affirmation_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AFFIRMATIONS
        .choose(rng)
        .copied()
        .unwrap_or("Small daily improvements lead to remarkable results over time.")
}

pub fn is_fallback_affirmation(text: &str) -> bool {
    AFFIRMATIONS.iter().any(|a| *a == text)
}

/// Keyword-match a habit against the category table.
pub fn suggest_category(name: &str, description: Option<&str>) -> &'static str {
    let text = format!("{} {}", name, description.unwrap_or("")).to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_CATEGORY_ID)
}

/// Static suggestions for `category` (or the default list), skipping any
/// that already contain the name of an existing habit.
pub fn suggest_habits(category: Option<&str>, existing_habits: &[String]) -> Vec<String> {
    let suggestions = category
        .and_then(|c| SUGGESTIONS.iter().find(|(key, _)| *key == c))
        .map(|(_, list)| *list)
        .unwrap_or(DEFAULT_SUGGESTIONS);

    let existing: Vec<String> = existing_habits
        .iter()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();

    suggestions
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            !existing.iter().any(|e| lower.contains(e.as_str()))
        })
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect()
}

/// Generic tips for keeping up a habit.
pub fn habit_tips(habit_name: &str) -> Vec<String> {
    vec![
        format!("Attach \"{}\" to something you already do every day.", habit_name),
        "Start small enough that skipping feels silly.".to_string(),
        "Mark each completion right away so your streak stays visible.".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_category_keyword_match() {
        assert_eq!(suggest_category("Morning run", None), "fitness");
        assert_eq!(suggest_category("Xyzzy", None), OTHER_CATEGORY_ID);
    }

    #[test]
    fn test_category_uses_description() {
        assert_eq!(
            suggest_category("Evening routine", Some("Read before bed")),
            "sleep"
        );
        assert_eq!(suggest_category("Budget review", Some("")), "finance");
    }

    #[test]
    fn test_category_declaration_order_wins() {
        // "walk" (fitness) and "water" (nutrition) both match
        assert_eq!(suggest_category("Walk to the water", None), "fitness");
    }

    #[test]
    fn test_suggestions_exclude_existing() {
        let existing = vec!["Meditate daily".to_string()];
        let suggestions = suggest_habits(Some("wellness"), &existing);

        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        assert!(suggestions
            .iter()
            .all(|s| !s.to_lowercase().contains("meditate daily")));
    }

    #[test]
    fn test_suggestions_filter_case_insensitively() {
        let existing = vec!["READ 20 PAGES".to_string()];
        let suggestions = suggest_habits(Some("learning"), &existing);

        assert_eq!(
            suggestions,
            vec![
                "Learn 5 new vocabulary words",
                "Watch an educational video",
                "Practice a new skill for 30 minutes",
            ]
        );
    }

    #[test]
    fn test_unknown_category_uses_default_list() {
        let suggestions = suggest_habits(Some("astronomy"), &[]);
        assert_eq!(
            suggestions,
            vec!["Morning meditation", "Evening journaling", "Daily exercise"]
        );
        assert_eq!(suggest_habits(None, &[]), suggestions);
    }

    #[test]
    fn test_affirmation_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(is_fallback_affirmation(affirmation_with(&mut rng)));
        }
        assert!(is_fallback_affirmation(affirmation()));
    }

    #[test]
    fn test_habit_tips_mention_habit() {
        let tips = habit_tips("Drink water");
        assert_eq!(tips.len(), MAX_SUGGESTIONS);
        assert!(tips[0].contains("Drink water"));
    }
}
