//! Due-date parsing and urgency tiers.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Urgency tier derived from a due date, independent of completion status.
///
/// Variant order is the sort order: `Overdue` first, `Low` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Overdue,
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Tier for a whole number of days until due (ceiling-rounded).
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            Priority::Overdue
        } else if days <= 2 {
            Priority::Urgent
        } else if days <= 7 {
            Priority::High
        } else if days <= 14 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Sort key: 0 for overdue through 4 for low.
    pub fn ordinal(self) -> u8 {
        match self {
            Priority::Overdue => 0,
            Priority::Urgent => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Overdue => "overdue",
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a stored due date.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` timestamp (read in
/// `local`), or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_due_date(raw: &str, local: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"));
    if let Ok(naive) = naive {
        return local.from_local_datetime(&naive).single();
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Whole days until `due`, rounding any fraction up.
///
/// Thirty minutes from now is 1; thirty minutes ago is 0.
pub fn days_until_due(due: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> i64 {
    let millis = (due - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Urgency tier for a stored due date. Unparseable dates are `Low`.
pub fn calculate_priority(due_date: &str, now: DateTime<FixedOffset>) -> Priority {
    match parse_due_date(due_date, *now.offset()) {
        Some(due) => Priority::from_days(days_until_due(due, now)),
        None => Priority::Low,
    }
}

/// Short human label for a day count.
pub fn due_label(days: i64) -> String {
    match days {
        d if d < 0 => "Overdue".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        d => format!("{} days", d),
    }
}
