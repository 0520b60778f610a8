//! Completion toggle and the streak state machine.
//!
//! Un-completing an assignment lowers `total_completed` but leaves both
//! streak counters alone; a streak credited today stays credited.

use chrono::{DateTime, FixedOffset};

use crate::model::{Assignment, AssignmentId, Stats};
use crate::store::PersistedStore;

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The list to hold in memory from now on
    pub assignments: Vec<Assignment>,
    /// Stats after the toggle
    pub stats: Stats,
    /// Whether any assignment matched `id`
    pub changed: bool,
    /// Whether the new blob reached storage
    pub persisted: bool,
}

/// Advance the streak for a completion happening at `now`.
///
/// Must run before `last_completed_date` is overwritten. Calendar days are
/// taken in `now`'s offset.
pub fn update_streak(stats: &mut Stats, now: DateTime<FixedOffset>) {
    let today = now.date_naive();
    let last_day = stats
        .last_completed_date
        .map(|last| last.with_timezone(now.offset()).date_naive());

    if last_day == Some(today) {
        return;
    }

    if last_day.is_some() && last_day == today.pred_opt() {
        stats.current_streak += 1;
    } else {
        stats.current_streak = 1;
    }

    stats.best_streak = stats.best_streak.max(stats.current_streak);
}

/// Flip the completion status of the assignment with `id` and persist.
///
/// Stats come from the store (defaults if none); the assignment list comes
/// from the caller. The store receives assignments and stats in one write.
/// An unknown `id` returns `current` unchanged and writes nothing.
pub fn toggle_status(
    store: &PersistedStore,
    id: &AssignmentId,
    current: &[Assignment],
    now: DateTime<FixedOffset>,
) -> ToggleOutcome {
    let mut blob = store.load_or_default();
    let mut changed = false;

    let assignments: Vec<Assignment> = current
        .iter()
        .map(|assignment| {
            if &assignment.id != id {
                return assignment.clone();
            }
            changed = true;

            let was_completed = assignment.is_completed();
            if was_completed {
                blob.stats.total_completed = blob.stats.total_completed.saturating_sub(1);
            } else {
                blob.stats.total_completed += 1;
                update_streak(&mut blob.stats, now);
                blob.stats.last_completed_date = Some(now);
            }

            let mut updated = assignment.clone();
            updated.status = assignment.status.flipped();
            updated
        })
        .collect();

    if !changed {
        tracing::debug!("Toggle for unknown assignment {}; nothing to do", id);
        return ToggleOutcome {
            assignments,
            stats: blob.stats,
            changed: false,
            persisted: false,
        };
    }

    blob.assignments = assignments.clone();
    let persisted = store.save(&blob);
    tracing::info!(
        "Toggled assignment {} (completed: {}, streak: {})",
        id,
        blob.stats.total_completed,
        blob.stats.current_streak
    );

    ToggleOutcome {
        assignments,
        stats: blob.stats,
        changed: true,
        persisted,
    }
}
