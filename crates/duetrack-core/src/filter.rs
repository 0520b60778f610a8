//! Search, type filter and sort for the visible list.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};

use crate::model::{Assignment, FilterType, SortBy};
use crate::priority::{calculate_priority, parse_due_date};

/// What the user has asked to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of title or course; empty matches all
    pub search: String,
    pub filter_type: FilterType,
    pub sort_by: SortBy,
}

impl FilterCriteria {
    pub fn new(search: impl Into<String>, filter_type: FilterType, sort_by: SortBy) -> Self {
        Self {
            search: search.into(),
            filter_type,
            sort_by,
        }
    }

    fn matches(&self, needle: &str, assignment: &Assignment) -> bool {
        if !self.filter_type.matches(assignment.kind) {
            return false;
        }
        needle.is_empty()
            || assignment.title.to_lowercase().contains(needle)
            || assignment.course.to_lowercase().contains(needle)
    }
}

/// Filter and order `assignments` for display.
///
/// Sorting is stable, so equal keys keep their input order. An unrecognized
/// sort key leaves the filtered list in input order. Unparseable due dates
/// sort after every parseable one.
pub fn filter_and_sort(
    assignments: &[Assignment],
    criteria: &FilterCriteria,
    now: DateTime<FixedOffset>,
) -> Vec<Assignment> {
    let needle = criteria.search.to_lowercase();
    let mut visible: Vec<Assignment> = assignments
        .iter()
        .filter(|a| criteria.matches(&needle, a))
        .cloned()
        .collect();

    match &criteria.sort_by {
        SortBy::DueDate => {
            let offset = *now.offset();
            // `None` sorts before `Some`, so flip it to push bad dates last.
            visible.sort_by_cached_key(|a| {
                let due = parse_due_date(&a.due_date, offset);
                (due.is_none(), due)
            });
        }
        SortBy::Priority => {
            visible.sort_by_cached_key(|a| calculate_priority(&a.due_date, now).ordinal());
        }
        SortBy::Course => visible.sort_by(|a, b| compare_course(&a.course, &b.course)),
        SortBy::Unrecognized(key) => {
            tracing::debug!("Unknown sort key {:?}; keeping input order", key);
        }
    }

    visible
}

/// Case-folded comparison. On a case-only tie the lowercase spelling goes first.
fn compare_course(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
