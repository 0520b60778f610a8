//! End-to-end tests of the core engines over real storage slots.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::Duration;
use duetrack_core::{
    compute_stats, filter_and_sort, reconcile, toggle_status, Assignment, AssignmentId,
    AssignmentStatus, AssignmentType, Clock, FileSlot, FilterCriteria, FilterType, FixedClock,
    PersistedStore, PreferencesUpdate, SortBy, SqliteSlot, ViewMode,
};
use tempfile::TempDir;

fn seed() -> Vec<Assignment> {
    vec![
        Assignment::new(1_i64, "React Quiz", "Web Development", AssignmentType::Quiz, "2026-01-21T10:00:00Z"),
        Assignment::new(2_i64, "Schema Design", "Database Systems", AssignmentType::Project, "2026-01-30T23:59:00Z"),
        Assignment::new(3_i64, "Search Lab", "AI", AssignmentType::Lab, "2026-01-18T23:59:00Z"),
    ]
}

#[test]
fn test_state_survives_reopen_of_file_slot() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at("2026-01-20T09:00:00+00:00").unwrap();

    {
        let store = PersistedStore::new(FileSlot::new(dir.path(), "assignmentTracker"));
        let list = store.seed_if_empty(&seed());
        let out = toggle_status(&store, &AssignmentId::from(1_i64), &list, clock.now());
        assert!(out.persisted);
        store.save_preferences(PreferencesUpdate {
            view_mode: Some(ViewMode::List),
            ..Default::default()
        });
    }

    let reopened = PersistedStore::new(FileSlot::new(dir.path(), "assignmentTracker"));
    let blob = reopened.load().unwrap();
    assert!(blob.assignments[0].is_completed());
    assert_eq!(blob.stats.total_completed, 1);
    assert_eq!(blob.stats.current_streak, 1);
    assert_eq!(blob.user_preferences.view_mode, ViewMode::List);
}

#[test]
fn test_streak_over_days_with_sqlite_slot() {
    let dir = TempDir::new().unwrap();
    let store = PersistedStore::new(SqliteSlot::new(dir.path().join("state.db"), "assignmentTracker").unwrap());
    let clock = FixedClock::at("2026-01-20T18:00:00+00:00").unwrap();

    let mut list = store.seed_if_empty(&seed());
    list = toggle_status(&store, &AssignmentId::from(1_i64), &list, clock.now()).assignments;

    clock.advance(Duration::days(1));
    list = toggle_status(&store, &AssignmentId::from(2_i64), &list, clock.now()).assignments;
    assert_eq!(store.stats().current_streak, 2);

    // Un-completing does not roll back the streak.
    list = toggle_status(&store, &AssignmentId::from(2_i64), &list, clock.now()).assignments;
    let stats = store.stats();
    assert_eq!(stats.total_completed, 1);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.best_streak, 2);

    clock.advance(Duration::days(3));
    toggle_status(&store, &AssignmentId::from(3_i64), &list, clock.now());
    let stats = store.stats();
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.best_streak, 2);
}

#[test]
fn test_refresh_keeps_completion_and_feeds_views() {
    let store = PersistedStore::in_memory();
    let clock = FixedClock::at("2026-01-20T12:00:00+00:00").unwrap();
    let local = store.seed_if_empty(&seed());
    let local = toggle_status(&store, &AssignmentId::from(2_i64), &local, clock.now()).assignments;

    // A refetch drops item 1 and adds item 4.
    let mut fetched = seed();
    fetched.remove(0);
    fetched.push(Assignment::new(4_i64, "Pitch", "Entrepreneurship", AssignmentType::Presentation, "2026-01-22T09:00:00Z"));

    let merged = reconcile(fetched, &local);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].status, AssignmentStatus::Completed);
    assert!(!merged.iter().any(|a| a.id == AssignmentId::from(1_i64)));
    store.save_assignments(&merged);

    let dash = compute_stats(&merged, &store.stats(), clock.now());
    assert_eq!(dash.total, 3);
    assert_eq!(dash.completed, 1);
    assert_eq!(dash.overdue, 1);
    assert_eq!(dash.upcoming, 1);
    assert_eq!(dash.completion_rate, 33);
    assert_eq!(dash.streak, 1);

    let criteria = FilterCriteria::new("", FilterType::All, SortBy::Priority);
    let ordered: Vec<AssignmentId> = filter_and_sort(&merged, &criteria, clock.now())
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(
        ordered,
        vec![AssignmentId::from(3_i64), AssignmentId::from(4_i64), AssignmentId::from(2_i64)]
    );
}
