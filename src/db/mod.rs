//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const HABITS: &str = "habits";
    /// Completion events (keyed by completion id, indexed by habit_id)
    pub const COMPLETIONS: &str = "completions";
    /// User-defined categories; built-ins are never stored
    pub const CATEGORIES: &str = "categories";
    pub const AFFIRMATIONS: &str = "affirmations";
}
