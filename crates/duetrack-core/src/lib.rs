//! Core library for Duetrack.
//!
//! Owns the persisted state blob and every computation derived from it:
//! priority tiers, merge-on-load reconciliation, the completion toggle and
//! streak state machine, dashboard statistics, and filtering/sorting.

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod priority;
pub mod reconcile;
pub mod stats;
pub mod store;
pub mod toggle;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ContentConfig, LoadConfig, StorageBackend, StorageConfig, TrackerConfig};
pub use error::{ConfigError, StorageError, TrackerError};
pub use filter::{filter_and_sort, FilterCriteria};
pub use model::{
    Assignment, AssignmentId, AssignmentStatus, AssignmentType, FilterType, PersistedBlob,
    PreferencesUpdate, SortBy, Stats, Theme, UserPreferences, ViewMode,
};
pub use priority::{calculate_priority, days_until_due, due_label, parse_due_date, Priority};
pub use reconcile::reconcile;
pub use stats::{compute_stats, DashboardStats};
pub use store::{FileSlot, MemorySlot, PersistedStore, SlotStorage, SqliteSlot};
pub use toggle::{toggle_status, update_streak, ToggleOutcome};

/// Initialize logging for the tracker.
///
/// Reads the filter from `RUST_LOG`, falling back to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Duetrack core initialized");
    }
}
