//! Dashboard counters, recomputed from the full list on every change.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::model::{Assignment, Stats};
use crate::priority::{days_until_due, parse_due_date};

/// Summary numbers shown above the assignment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    /// Pending and due within the next seven days
    pub upcoming: usize,
    /// Pending and past the due instant
    pub overdue: usize,
    pub completed: usize,
    /// Percentage, rounded to the nearest integer
    pub completion_rate: u32,
    pub streak: u32,
    pub best_streak: u32,
}

/// Compute dashboard counters for `assignments` at `now`.
///
/// `overdue` compares instants, not rounded day counts, so an item due an
/// hour ago counts even though its day count is still 0. Items whose due date
/// cannot be parsed are neither upcoming nor overdue.
pub fn compute_stats(
    assignments: &[Assignment],
    user_stats: &Stats,
    now: DateTime<FixedOffset>,
) -> DashboardStats {
    let mut out = DashboardStats {
        total: assignments.len(),
        streak: user_stats.current_streak,
        best_streak: user_stats.best_streak,
        ..Default::default()
    };

    for assignment in assignments {
        if assignment.is_completed() {
            out.completed += 1;
            continue;
        }
        let Some(due) = parse_due_date(&assignment.due_date, *now.offset()) else {
            continue;
        };
        if due < now {
            out.overdue += 1;
        }
        if (0..=7).contains(&days_until_due(due, now)) {
            out.upcoming += 1;
        }
    }

    out.completion_rate = completion_rate(out.completed, out.total);
    out
}

fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}
