//! Load lifecycle errors.

use std::time::Duration;

use duetrack_content::ContentError;
use thiserror::Error;

/// Why a load did not produce a fresh list.
///
/// Never fatal: the session keeps showing its local list.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Content fetch failed: {0}")]
    Content(#[from] ContentError),

    #[error("Content fetch exceeded {0:?}")]
    TimedOut(Duration),

    #[error("Load cancelled")]
    Cancelled,
}

impl LoadError {
    /// Non-blocking notice for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            Self::Content(e) => e.user_message(),
            Self::TimedOut(_) => "Assignments are taking too long to load. Showing saved assignments.".to_string(),
            Self::Cancelled => "Loading was cancelled.".to_string(),
        }
    }
}
