// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit categories: a fixed built-in catalog plus user-defined entries.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Catch-all category used when nothing else matches.
pub const OTHER_CATEGORY_ID: &str = "other";

/// A category a habit can reference.
///
/// Built-in categories have no owner. Custom categories are stored in
/// Firestore under the `categories` collection and carry their `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

struct BuiltinCategory {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    color: &'static str,
}

const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory { id: "health", name: "Health", icon: "heart", color: "#9333ea" },
    BuiltinCategory { id: "fitness", name: "Fitness", icon: "dumbbell", color: "#ef4444" },
    BuiltinCategory { id: "nutrition", name: "Nutrition", icon: "apple", color: "#22c55e" },
    BuiltinCategory { id: "sleep", name: "Sleep", icon: "moon", color: "#6366f1" },
    BuiltinCategory { id: "mindfulness", name: "Mindfulness", icon: "meditation", color: "#8b5cf6" },
    BuiltinCategory { id: "wellness", name: "Wellness", icon: "heart", color: "#a855f7" },
    BuiltinCategory { id: "learning", name: "Learning", icon: "book", color: "#7c3aed" },
    BuiltinCategory { id: "productivity", name: "Productivity", icon: "brain", color: "#0ea5e9" },
    BuiltinCategory { id: "creativity", name: "Creativity", icon: "paint", color: "#f97316" },
    BuiltinCategory { id: "social", name: "Social", icon: "coffee", color: "#ec4899" },
    BuiltinCategory { id: "finance", name: "Finance", icon: "sun", color: "#eab308" },
    BuiltinCategory { id: OTHER_CATEGORY_ID, name: "Other", icon: "sparkles", color: "#c084fc" },
];

impl From<&BuiltinCategory> for Category {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            id: builtin.id.to_string(),
            name: builtin.name.to_string(),
            icon: builtin.icon.to_string(),
            color: builtin.color.to_string(),
            user_id: None,
        }
    }
}

/// All built-in categories in catalog order.
pub fn builtin_categories() -> Vec<Category> {
    BUILTIN_CATEGORIES.iter().map(Category::from).collect()
}

/// Ids of the built-in categories, in catalog order.
pub fn builtin_category_ids() -> impl Iterator<Item = &'static str> {
    BUILTIN_CATEGORIES.iter().map(|c| c.id)
}

/// Look up a built-in category by id.
pub fn builtin_category(id: &str) -> Option<Category> {
    BUILTIN_CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .map(Category::from)
}

pub fn is_builtin_category(id: &str) -> bool {
    BUILTIN_CATEGORIES.iter().any(|c| c.id == id)
}

/// The catch-all category.
pub fn other_category() -> Category {
    Category {
        id: OTHER_CATEGORY_ID.to_string(),
        name: "Other".to_string(),
        icon: "sparkles".to_string(),
        color: "#c084fc".to_string(),
        user_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let fitness = builtin_category("fitness").unwrap();
        assert_eq!(fitness.name, "Fitness");
        assert!(fitness.user_id.is_none());

        assert!(builtin_category("gardening").is_none());
        assert!(is_builtin_category(OTHER_CATEGORY_ID));
    }

    #[test]
    fn test_other_matches_catalog_entry() {
        assert_eq!(builtin_category(OTHER_CATEGORY_ID), Some(other_category()));
        assert_eq!(builtin_category_ids().last(), Some(OTHER_CATEGORY_ID));
    }
}
