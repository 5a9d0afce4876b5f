// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Habits (owned by a user, optionally archived)
//! - Completions (timestamped events, indexed by habit)
//! - Categories (user-defined; built-ins live in code)
//! - Affirmations (generated history per user)

use chrono::{DateTime, Utc};
use firestore::{FirestoreQueryDirection, FirestoreTimestamp};
use futures_util::{stream, StreamExt};

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Affirmation, Category, Completion, Habit};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token; skip credential discovery entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Habit Operations ────────────────────────────────────────

    pub async fn get_habit(&self, habit_id: &str) -> Result<Option<Habit>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::HABITS)
            .obj()
            .one(habit_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a habit (document ID = habit id).
    pub async fn upsert_habit(&self, habit: &Habit) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::HABITS)
            .document_id(&habit.id)
            .object(habit)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// A user's habits, newest first.
    pub async fn list_habits_for_user(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> Result<Vec<Habit>, AppError> {
        let user_id = user_id.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::HABITS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    // `None` drops the condition from the conjunction
                    if include_archived {
                        None
                    } else {
                        q.field("archived").eq(false)
                    },
                ])
            })
            .order_by([("created_at", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a habit and every completion recorded against it.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_habit(&self, habit_id: &str) -> Result<usize, AppError> {
        let completions = self.get_completions_for_habit(habit_id, None).await?;
        let count = completions.len();

        self.batch_delete(&completions, collections::COMPLETIONS, |c: &Completion| {
            c.id.clone()
        })
        .await?;
        tracing::debug!(habit_id, count, "Deleted habit completions");

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::HABITS)
            .document_id(habit_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(habit_id, completions = count, "Habit deleted");

        Ok(count + 1)
    }

    // ─── Completion Operations ───────────────────────────────────

    pub async fn insert_completion(&self, completion: &Completion) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMPLETIONS)
            .document_id(&completion.id)
            .object(completion)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Completions for a habit, most recent first.
    pub async fn get_completions_for_habit(
        &self,
        habit_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Completion>, AppError> {
        let habit_id = habit_id.to_string();

        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::COMPLETIONS)
            .filter(move |q| q.field("habit_id").eq(habit_id.clone()))
            .order_by([("completed_at", FirestoreQueryDirection::Descending)]);

        let query = match limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Completion histories for several habits, in the same order as `habit_ids`.
    pub async fn get_completions_for_habits(
        &self,
        habit_ids: &[String],
    ) -> Result<Vec<Vec<Completion>>, AppError> {
        stream::iter(habit_ids.to_vec())
            .map(|habit_id| async move { self.get_completions_for_habit(&habit_id, None).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Vec<Completion>, AppError>>>()
            .await
            .into_iter()
            .collect()
    }

    /// Completions for a habit with `start <= completed_at < end`.
    pub async fn get_completions_in_range(
        &self,
        habit_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Completion>, AppError> {
        let habit_id = habit_id.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMPLETIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("habit_id").eq(habit_id.clone()),
                    q.field("completed_at")
                        .greater_than_or_equal(FirestoreTimestamp(start)),
                    q.field("completed_at").less_than(FirestoreTimestamp(end)),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every completion of a habit inside `[start, end)`.
    ///
    /// Returns the number of completions deleted (zero is not an error).
    pub async fn delete_completions_in_range(
        &self,
        habit_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<usize, AppError> {
        let completions = self.get_completions_in_range(habit_id, start, end).await?;
        let count = completions.len();

        self.batch_delete(&completions, collections::COMPLETIONS, |c: &Completion| {
            c.id.clone()
        })
        .await?;

        tracing::debug!(habit_id, count, "Deleted completions in range");
        Ok(count)
    }

    // ─── Category Operations ─────────────────────────────────────

    pub async fn list_custom_categories(&self, user_id: &str) -> Result<Vec<Category>, AppError> {
        let user_id = user_id.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::CATEGORIES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([("name", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_category(&self, category_id: &str) -> Result<Option<Category>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CATEGORIES)
            .obj()
            .one(category_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn upsert_category(&self, category: &Category) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CATEGORIES)
            .document_id(&category.id)
            .object(category)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CATEGORIES)
            .document_id(category_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Affirmation Operations ──────────────────────────────────

    pub async fn insert_affirmation(&self, affirmation: &Affirmation) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::AFFIRMATIONS)
            .document_id(&affirmation.id)
            .object(affirmation)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// A user's most recent affirmations, newest first.
    pub async fn list_affirmations(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Affirmation>, AppError> {
        let user_id = user_id.to_string();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::AFFIRMATIONS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([("created_at", FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}
