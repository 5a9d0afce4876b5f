// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST`); they are skipped otherwise.

use chrono::{DateTime, TimeZone, Utc};
use habit_tracker::models::{Affirmation, Category, Completion, Frequency, Habit, Period};
use habit_tracker::services::Provenance;
use habit_tracker::time_utils::day_bounds;

mod common;
use common::test_db;

/// Unique id per test run for isolation.
fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn test_habit(user_id: &str, name: &str, created_at: DateTime<Utc>) -> Habit {
    Habit {
        id: unique_id("habit"),
        user_id: user_id.to_string(),
        name: name.to_string(),
        description: None,
        icon: "sparkles".to_string(),
        color: "#a855f7".to_string(),
        category_id: Some("fitness".to_string()),
        frequency: Frequency::Daily,
        target_count: 1,
        target_period: Period::Day,
        archived: false,
        created_at,
        updated_at: created_at,
    }
}

fn test_completion(habit_id: &str, completed_at: DateTime<Utc>) -> Completion {
    Completion {
        id: unique_id("completion"),
        habit_id: habit_id.to_string(),
        completed_at,
        note: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HABIT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_habit_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let habit = test_habit(&user_id, "Morning run", at(2024, 3, 1, 8, 0));

    assert!(db.get_habit(&habit.id).await.unwrap().is_none());
    db.upsert_habit(&habit).await.unwrap();

    let fetched = db.get_habit(&habit.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Morning run");
    assert_eq!(fetched.frequency, Frequency::Daily);
    assert_eq!(fetched.created_at, habit.created_at);
}

#[tokio::test]
async fn test_list_habits_newest_first_and_archived_filter() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");

    let older = test_habit(&user_id, "Read", at(2024, 3, 1, 8, 0));
    let newer = test_habit(&user_id, "Stretch", at(2024, 3, 2, 8, 0));
    let mut archived = test_habit(&user_id, "Old habit", at(2024, 3, 3, 8, 0));
    archived.archived = true;

    for habit in [&older, &newer, &archived] {
        db.upsert_habit(habit).await.unwrap();
    }

    let active = db.list_habits_for_user(&user_id, false).await.unwrap();
    let names: Vec<&str> = active.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Stretch", "Read"]);

    let all = db.list_habits_for_user(&user_id, true).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "Old habit");
}

// ═══════════════════════════════════════════════════════════════════════════
// COMPLETION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_delete_completions_for_one_day_only() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let x = test_habit(&user_id, "X", at(2024, 3, 1, 8, 0));
    let y = test_habit(&user_id, "Y", at(2024, 3, 1, 8, 0));
    db.upsert_habit(&x).await.unwrap();
    db.upsert_habit(&y).await.unwrap();

    let completions = [
        test_completion(&x.id, at(2024, 3, 15, 0, 0)),
        test_completion(&x.id, at(2024, 3, 15, 23, 59)),
        test_completion(
            &x.id,
            at(2024, 3, 15, 23, 59) + chrono::Duration::microseconds(59_999_500),
        ),
        test_completion(&x.id, at(2024, 3, 14, 23, 59)),
        test_completion(&x.id, at(2024, 3, 16, 0, 0)),
        test_completion(&y.id, at(2024, 3, 15, 12, 0)),
    ];
    for completion in &completions {
        db.insert_completion(completion).await.unwrap();
    }

    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let (start, end) = day_bounds(date);
    let deleted = db.delete_completions_in_range(&x.id, start, end).await.unwrap();
    assert_eq!(deleted, 3);

    let remaining_x = db.get_completions_for_habit(&x.id, None).await.unwrap();
    let times: Vec<DateTime<Utc>> = remaining_x.iter().map(|c| c.completed_at).collect();
    assert_eq!(times, vec![at(2024, 3, 16, 0, 0), at(2024, 3, 14, 23, 59)]);

    let remaining_y = db.get_completions_for_habit(&y.id, None).await.unwrap();
    assert_eq!(remaining_y.len(), 1);

    // Nothing left on that day: deleting again is not an error
    assert_eq!(
        db.delete_completions_in_range(&x.id, start, end).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_completions_for_habits_preserve_order() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let a = test_habit(&user_id, "A", at(2024, 3, 1, 8, 0));
    let b = test_habit(&user_id, "B", at(2024, 3, 1, 8, 0));

    db.insert_completion(&test_completion(&b.id, at(2024, 3, 2, 9, 0)))
        .await
        .unwrap();
    db.insert_completion(&test_completion(&b.id, at(2024, 3, 3, 9, 0)))
        .await
        .unwrap();

    let histories = db
        .get_completions_for_habits(&[a.id.clone(), b.id.clone()])
        .await
        .unwrap();

    assert_eq!(histories.len(), 2);
    assert!(histories[0].is_empty());
    assert_eq!(histories[1].len(), 2);
}

#[tokio::test]
async fn test_delete_habit_cascades() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");
    let habit = test_habit(&user_id, "Journal", at(2024, 3, 1, 8, 0));
    db.upsert_habit(&habit).await.unwrap();

    for day in 1..=3 {
        db.insert_completion(&test_completion(&habit.id, at(2024, 3, day, 21, 0)))
            .await
            .unwrap();
    }

    let deleted = db.delete_habit(&habit.id).await.unwrap();
    assert_eq!(deleted, 4);

    assert!(db.get_habit(&habit.id).await.unwrap().is_none());
    assert!(db
        .get_completions_for_habit(&habit.id, None)
        .await
        .unwrap()
        .is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// CATEGORY & AFFIRMATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_custom_categories_scoped_to_owner() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_id("user");
    let other = unique_id("user");

    let category = Category {
        id: unique_id("category"),
        name: "Garden".to_string(),
        icon: "leaf".to_string(),
        color: "#22c55e".to_string(),
        user_id: Some(owner.clone()),
    };
    db.upsert_category(&category).await.unwrap();

    assert_eq!(db.list_custom_categories(&owner).await.unwrap(), vec![category.clone()]);
    assert!(db.list_custom_categories(&other).await.unwrap().is_empty());

    db.delete_category(&category.id).await.unwrap();
    assert!(db.get_category(&category.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_affirmation_history_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_id("user");

    for (i, hour) in [8, 10, 9].into_iter().enumerate() {
        db.insert_affirmation(&Affirmation {
            id: unique_id("affirmation"),
            user_id: user_id.clone(),
            content: format!("Affirmation {}", i),
            source: Provenance::Fallback,
            created_at: at(2024, 3, 15, hour, 0),
        })
        .await
        .unwrap();
    }

    let history = db.list_affirmations(&user_id, 2).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|a| a.content.as_str()).collect();
    assert_eq!(contents, vec!["Affirmation 1", "Affirmation 2"]);
}
