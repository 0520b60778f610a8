//! Wire types for the content query API.

use serde::Deserialize;

use duetrack_core::{Assignment, AssignmentId, AssignmentType};

/// Envelope around every query result.
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
    /// Server-side query time
    #[serde(default)]
    pub ms: Option<u64>,
}

/// An `assignment` document as stored in the CMS.
///
/// Carries no status; completion is tracked locally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl AssignmentDocument {
    /// Convert to a pending assignment.
    ///
    /// Returns `None` when the document has no recognizable type, since the
    /// type filter has nowhere to put it.
    pub fn into_assignment(self) -> Option<Assignment> {
        let kind = match self.kind.as_deref().map(str::parse::<AssignmentType>) {
            Some(Ok(kind)) => kind,
            _ => {
                tracing::warn!("Skipping assignment {}: unknown type {:?}", self.id, self.kind);
                return None;
            }
        };

        let mut assignment = Assignment::new(
            AssignmentId::Text(self.id),
            self.title.unwrap_or_default(),
            self.course.unwrap_or_default(),
            kind,
            self.due_date.unwrap_or_default(),
        );
        assignment.course_code = self.course_code;
        assignment.description = self.description;
        Some(assignment)
    }
}
