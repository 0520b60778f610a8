//! Durable state: the persisted blob and the slot it lives in.
//!
//! Every operation reads or writes the whole blob. Failures are logged and
//! absorbed: reads fall back to defaults and writes report `false`, so the
//! caller's in-memory state stays authoritative for the session.

mod file;
mod slot;
mod sqlite;

pub use file::FileSlot;
pub use slot::{MemorySlot, SlotStorage};
pub use sqlite::SqliteSlot;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;
use crate::model::{Assignment, PersistedBlob, PreferencesUpdate, Stats, UserPreferences};

/// Owner of the single persisted state blob.
pub struct PersistedStore {
    slot: Box<dyn SlotStorage>,
}

impl PersistedStore {
    pub fn new(slot: impl SlotStorage + 'static) -> Self {
        Self {
            slot: Box::new(slot),
        }
    }

    /// A store over a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(MemorySlot::new())
    }

    /// Open the slot selected by configuration.
    ///
    /// # Errors
    /// Returns an error if the SQLite database cannot be opened.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let dir = config.resolved_data_dir();
        let store = match config.backend {
            StorageBackend::Memory => Self::in_memory(),
            StorageBackend::File => Self::new(FileSlot::new(&dir, &config.storage_key)),
            StorageBackend::Sqlite => {
                std::fs::create_dir_all(&dir)
                    .map_err(|e| StorageError::Write(format!("{}: {}", dir.display(), e)))?;
                Self::new(SqliteSlot::new(dir.join("duetrack.db"), &config.storage_key)?)
            }
        };
        tracing::info!("Opened state store ({})", store.slot.describe());
        Ok(store)
    }

    /// Read the blob. `None` on first use or if the stored blob is unreadable.
    pub fn load(&self) -> Option<PersistedBlob> {
        match self.try_load() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Error reading stored state: {}", e);
                None
            }
        }
    }

    /// Read the blob, surfacing the failure reason.
    ///
    /// # Errors
    /// Returns the slot's read error or a `Corrupt` error for bad JSON.
    pub fn try_load(&self) -> Result<Option<PersistedBlob>, StorageError> {
        match self.slot.read()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Write the whole blob. Returns `false` if the write failed.
    pub fn save(&self, blob: &PersistedBlob) -> bool {
        match self.try_save(blob) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Error saving state: {}", e);
                false
            }
        }
    }

    /// Write the whole blob, surfacing the failure reason.
    ///
    /// # Errors
    /// Returns the slot's write error.
    pub fn try_save(&self, blob: &PersistedBlob) -> Result<(), StorageError> {
        let raw = serde_json::to_string(blob)?;
        self.slot.write(&raw)
    }

    /// The stored blob, or a default one.
    pub fn load_or_default(&self) -> PersistedBlob {
        self.load().unwrap_or_default()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.load().map(|b| b.assignments).unwrap_or_default()
    }

    pub fn preferences(&self) -> UserPreferences {
        self.load().map(|b| b.user_preferences).unwrap_or_default()
    }

    pub fn stats(&self) -> Stats {
        self.load().map(|b| b.stats).unwrap_or_default()
    }

    /// Replace the stored assignment list, keeping preferences and stats.
    pub fn save_assignments(&self, assignments: &[Assignment]) -> bool {
        let mut blob = self.load_or_default();
        blob.assignments = assignments.to_vec();
        self.save(&blob)
    }

    /// Merge `update` into the stored preferences.
    pub fn save_preferences(&self, update: PreferencesUpdate) -> bool {
        let mut blob = self.load_or_default();
        blob.user_preferences = update.merge_into(&blob.user_preferences);
        self.save(&blob)
    }

    /// First-run seeding.
    ///
    /// If nothing is stored, writes a default blob holding `seed`. If a blob
    /// exists but its list is empty, only the list is replaced; stats and
    /// preferences are kept, and an empty `seed` writes nothing. A non-empty
    /// stored list is returned as is.
    pub fn seed_if_empty(&self, seed: &[Assignment]) -> Vec<Assignment> {
        match self.load() {
            Some(blob) if !blob.assignments.is_empty() => blob.assignments,
            Some(_) if seed.is_empty() => Vec::new(),
            Some(mut blob) => {
                tracing::info!("Seeding stored state with {} assignments", seed.len());
                blob.assignments = seed.to_vec();
                self.save(&blob);
                blob.assignments
            }
            None => {
                tracing::info!("Seeding state with {} assignments", seed.len());
                self.save(&PersistedBlob::with_assignments(seed.to_vec()));
                seed.to_vec()
            }
        }
    }

    /// Remove all stored state. Returns `false` if the slot could not be cleared.
    pub fn clear(&self) -> bool {
        match self.slot.clear() {
            Ok(()) => {
                tracing::info!("Cleared stored state");
                true
            }
            Err(e) => {
                tracing::warn!("Error clearing stored state: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("slot", &self.slot.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::model::{AssignmentStatus, AssignmentType, FilterType, SortBy, Theme, ViewMode};

    fn sample() -> Vec<Assignment> {
        vec![
            Assignment::new(1_i64, "Quiz", "Web Development", AssignmentType::Quiz, "2026-01-18T10:00:00"),
            Assignment::new("doc-2", "Lab 3", "AI", AssignmentType::Lab, "2026-01-19T23:59:00Z")
                .with_status(AssignmentStatus::Completed),
        ]
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = PersistedStore::in_memory();
        assert!(store.load().is_none());
        assert!(store.assignments().is_empty());
        assert_eq!(store.preferences(), UserPreferences::default());
        assert_eq!(store.stats(), Stats::default());
    }

    #[test]
    fn test_save_load_round_trip_is_deep_equal() {
        let store = PersistedStore::in_memory();
        let mut blob = PersistedBlob::with_assignments(sample());
        blob.stats.total_completed = 3;
        blob.stats.current_streak = 2;
        blob.stats.best_streak = 5;
        blob.stats.last_completed_date =
            Some(chrono::DateTime::parse_from_rfc3339("2026-01-19T08:30:00.000Z").unwrap());

        assert!(store.save(&blob));
        let loaded = store.load().unwrap();
        assert_eq!(loaded, blob);

        assert!(store.save(&loaded));
        assert_eq!(store.load().unwrap(), blob);
    }

    #[test]
    fn test_corrupt_blob_loads_as_absent() {
        let store = PersistedStore::new(MemorySlot::with_value("not json {{{"));
        assert!(store.load().is_none());
        assert!(matches!(store.try_load(), Err(StorageError::Corrupt(_))));
        assert_eq!(store.stats(), Stats::default());
    }

    #[test]
    fn test_save_failure_returns_false() {
        let store = PersistedStore::new(MemorySlot::with_capacity(16));
        assert!(!store.save(&PersistedBlob::with_assignments(sample())));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_assignments_keeps_other_fields() {
        let store = PersistedStore::in_memory();
        let mut blob = PersistedBlob::default();
        blob.stats.best_streak = 4;
        blob.user_preferences.theme = Theme::Dark;
        store.save(&blob);

        assert!(store.save_assignments(&sample()));
        let loaded = store.load().unwrap();
        assert_eq!(loaded.assignments, sample());
        assert_eq!(loaded.stats.best_streak, 4);
        assert_eq!(loaded.user_preferences.theme, Theme::Dark);
    }

    #[test]
    fn test_save_preferences_merges() {
        let store = PersistedStore::in_memory();
        store.save_preferences(PreferencesUpdate {
            theme: Some(Theme::Dark),
            ..Default::default()
        });
        store.save_preferences(PreferencesUpdate {
            view_mode: Some(ViewMode::List),
            sort_by: Some(SortBy::Priority),
            filter_type: Some(FilterType::Only(AssignmentType::Exam)),
            theme: None,
        });

        let prefs = store.preferences();
        assert_eq!(prefs.view_mode, ViewMode::List);
        assert_eq!(prefs.sort_by, SortBy::Priority);
        assert_eq!(prefs.filter_type, FilterType::Only(AssignmentType::Exam));
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn test_seed_if_empty_seeds_defaults() {
        let store = PersistedStore::in_memory();
        let seeded = store.seed_if_empty(&sample());
        assert_eq!(seeded, sample());

        let blob = store.load().unwrap();
        assert_eq!(blob.user_preferences.view_mode, ViewMode::Grid);
        assert_eq!(blob.user_preferences.sort_by, SortBy::DueDate);
        assert_eq!(blob.user_preferences.filter_type, FilterType::All);
        assert_eq!(blob.stats.total_completed, 0);
        assert_eq!(blob.stats.current_streak, 0);
        assert_eq!(blob.stats.best_streak, 0);
    }

    #[test]
    fn test_seed_if_empty_keeps_existing() {
        let store = PersistedStore::in_memory();
        let existing = vec![sample()[1].clone()];
        store.save_assignments(&existing);
        assert_eq!(store.seed_if_empty(&sample()), existing);
    }

    #[test]
    fn test_seed_if_empty_keeps_stats_and_preferences() {
        let store = PersistedStore::in_memory();
        let mut blob = PersistedBlob::default();
        blob.stats.current_streak = 5;
        blob.stats.best_streak = 9;
        blob.user_preferences.view_mode = ViewMode::List;
        store.save(&blob);

        assert!(store.seed_if_empty(&[]).is_empty());
        assert_eq!(store.load().unwrap(), blob);

        assert_eq!(store.seed_if_empty(&sample()), sample());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.assignments, sample());
        assert_eq!(loaded.stats, blob.stats);
        assert_eq!(loaded.user_preferences.view_mode, ViewMode::List);
    }

    #[test]
    fn test_unknown_preference_value_keeps_rest_of_blob() {
        let raw = r#"{
            "assignments": [{"id": 1, "title": "Quiz", "course": "AI", "type": "quiz",
                             "dueDate": "2026-01-18T10:00:00", "status": "completed"}],
            "userPreferences": {"viewMode": "list", "sortBy": "priority", "filterType": "essay", "theme": "dark"},
            "stats": {"totalCompleted": 3, "currentStreak": 2, "bestStreak": 7, "lastCompletedDate": null}
        }"#;
        let store = PersistedStore::new(MemorySlot::with_value(raw));

        let blob = store.load().unwrap();
        assert_eq!(blob.stats.best_streak, 7);
        assert!(blob.assignments[0].is_completed());
        assert_eq!(blob.user_preferences.filter_type, FilterType::All);
        assert_eq!(blob.user_preferences.view_mode, ViewMode::List);
        assert_eq!(blob.user_preferences.theme, Theme::Dark);

        // A later preference write keeps the stats instead of resetting them.
        assert!(store.save_preferences(PreferencesUpdate {
            sort_by: Some(SortBy::Course),
            ..Default::default()
        }));
        assert_eq!(store.stats().best_streak, 7);
    }

    #[test]
    fn test_clear() {
        let store = PersistedStore::in_memory();
        store.save_assignments(&sample());
        assert!(store.clear());
        assert!(store.load().is_none());
    }
}
