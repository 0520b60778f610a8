//! Tracker data model and the persisted state blob.
//!
//! Field names serialize in camelCase so a blob written by one session reads
//! back field-for-field in the next.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Identity of an assignment as assigned by its content source.
///
/// Seed data uses numbers, the remote source uses document id strings. The
/// two never compare equal (`1` is not `"1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssignmentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentId::Number(n) => write!(f, "{}", n),
            AssignmentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for AssignmentId {
    fn from(n: i64) -> Self {
        AssignmentId::Number(n)
    }
}

impl From<&str> for AssignmentId {
    fn from(s: &str) -> Self {
        AssignmentId::Text(s.to_string())
    }
}

impl From<String> for AssignmentId {
    fn from(s: String) -> Self {
        AssignmentId::Text(s)
    }
}

/// Kind of academic work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Quiz,
    Assignment,
    Exam,
    Project,
    Presentation,
    Lab,
}

impl AssignmentType {
    pub const ALL: [AssignmentType; 6] = [
        AssignmentType::Quiz,
        AssignmentType::Assignment,
        AssignmentType::Exam,
        AssignmentType::Project,
        AssignmentType::Presentation,
        AssignmentType::Lab,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentType::Quiz => "quiz",
            AssignmentType::Assignment => "assignment",
            AssignmentType::Exam => "exam",
            AssignmentType::Project => "project",
            AssignmentType::Presentation => "presentation",
            AssignmentType::Lab => "lab",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssignmentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown assignment type: {}", s))
    }
}

/// Completion state. Only the toggle mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Completed,
}

impl AssignmentStatus {
    pub fn flipped(self) -> Self {
        match self {
            AssignmentStatus::Pending => AssignmentStatus::Completed,
            AssignmentStatus::Completed => AssignmentStatus::Pending,
        }
    }
}

/// A trackable academic task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(rename = "type")]
    pub kind: AssignmentType,
    /// ISO-8601 timestamp, kept exactly as received.
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: AssignmentStatus,
}

impl Assignment {
    /// Create a pending assignment with no course code or description.
    pub fn new(
        id: impl Into<AssignmentId>,
        title: impl Into<String>,
        course: impl Into<String>,
        kind: AssignmentType,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            course: course.into(),
            course_code: None,
            kind,
            due_date: due_date.into(),
            description: None,
            status: AssignmentStatus::Pending,
        }
    }

    pub fn with_course_code(mut self, code: impl Into<String>) -> Self {
        self.course_code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: AssignmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == AssignmentStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Sort order for the assignment list.
///
/// Values this version does not know are kept verbatim so they survive a
/// save, and sort as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortBy {
    #[default]
    DueDate,
    Priority,
    Course,
    Unrecognized(String),
}

impl From<String> for SortBy {
    fn from(s: String) -> Self {
        match s.as_str() {
            "dueDate" => SortBy::DueDate,
            "priority" => SortBy::Priority,
            "course" => SortBy::Course,
            _ => SortBy::Unrecognized(s),
        }
    }
}

impl From<SortBy> for String {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::DueDate => "dueDate".to_string(),
            SortBy::Priority => "priority".to_string(),
            SortBy::Course => "course".to_string(),
            SortBy::Unrecognized(s) => s,
        }
    }
}

/// Type filter: everything, or a single assignment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterType {
    #[default]
    All,
    Only(AssignmentType),
}

impl FilterType {
    pub fn matches(self, kind: AssignmentType) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Only(wanted) => wanted == kind,
        }
    }
}

impl TryFrom<String> for FilterType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "all" {
            Ok(FilterType::All)
        } else {
            s.parse().map(FilterType::Only)
        }
    }
}

impl From<FilterType> for String {
    fn from(filter: FilterType) -> Self {
        match filter {
            FilterType::All => "all".to_string(),
            FilterType::Only(kind) => kind.as_str().to_string(),
        }
    }
}

/// Persisted view preferences.
///
/// A field holding a value this version does not understand reads back as its
/// default instead of failing the whole blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    #[serde(deserialize_with = "lenient")]
    pub view_mode: ViewMode,
    pub sort_by: SortBy,
    #[serde(deserialize_with = "lenient")]
    pub filter_type: FilterType,
    #[serde(deserialize_with = "lenient")]
    pub theme: Theme,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match T::deserialize(&value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            tracing::warn!("Ignoring stored preference {}: {}", value, e);
            Ok(T::default())
        }
    }
}

/// A partial preferences write; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub view_mode: Option<ViewMode>,
    pub sort_by: Option<SortBy>,
    pub filter_type: Option<FilterType>,
    pub theme: Option<Theme>,
}

impl PreferencesUpdate {
    /// Shallow-merge this update over `prefs`.
    pub fn merge_into(self, prefs: &UserPreferences) -> UserPreferences {
        UserPreferences {
            view_mode: self.view_mode.unwrap_or(prefs.view_mode),
            sort_by: self.sort_by.unwrap_or_else(|| prefs.sort_by.clone()),
            filter_type: self.filter_type.unwrap_or(prefs.filter_type),
            theme: self.theme.unwrap_or(prefs.theme),
        }
    }
}

impl From<&UserPreferences> for PreferencesUpdate {
    fn from(prefs: &UserPreferences) -> Self {
        Self {
            view_mode: Some(prefs.view_mode),
            sort_by: Some(prefs.sort_by.clone()),
            filter_type: Some(prefs.filter_type),
            theme: Some(prefs.theme),
        }
    }
}

/// Completion counters and streak state.
///
/// `best_streak` never decreases and is at least every `current_streak`
/// value ever recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_completed: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_completed_date: Option<DateTime<FixedOffset>>,
}

/// The single unit of durable state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedBlob {
    pub assignments: Vec<Assignment>,
    pub user_preferences: UserPreferences,
    pub stats: Stats,
}

impl PersistedBlob {
    /// A fresh blob holding `assignments` and default preferences and stats.
    pub fn with_assignments(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments,
            ..Default::default()
        }
    }
}
