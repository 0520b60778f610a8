//! Pluggable assignment source.
//!
//! `ContentSource` wraps either the built-in seed list or the remote query
//! client behind one async interface, so the load path is the same for both.

use std::sync::Arc;

use anyhow::{Context, Result};

use duetrack_core::{Assignment, AssignmentId, ContentConfig};

use crate::client::ContentClient;
use crate::error::ContentError;
use crate::seed::seed_assignments;

/// Where assignments come from.
#[derive(Clone, Debug)]
pub enum ContentSource {
    /// A fixed list held in memory.
    Seed(Arc<Vec<Assignment>>),

    /// The headless CMS query API.
    Remote(Arc<ContentClient>),
}

impl ContentSource {
    /// The built-in sample assignments.
    pub fn seed() -> Self {
        Self::with_assignments(seed_assignments())
    }

    /// A fixed list of assignments.
    pub fn with_assignments(assignments: Vec<Assignment>) -> Self {
        Self::Seed(Arc::new(assignments))
    }

    pub fn remote(client: ContentClient) -> Self {
        Self::Remote(Arc::new(client))
    }

    /// A remote source for the project in `config`.
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        let client = ContentClient::new(config)
            .with_context(|| format!("Failed to create content client for {}", config.project_id))?;
        Ok(Self::remote(client))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Assignments to write into an empty store on first run.
    ///
    /// Remote sources have none; their list arrives with the first load.
    pub fn first_run_assignments(&self) -> &[Assignment] {
        match self {
            Self::Seed(list) => list.as_slice(),
            Self::Remote(_) => &[],
        }
    }

    /// Every assignment the source knows about, all `pending`.
    pub async fn fetch_assignments(&self) -> Result<Vec<Assignment>, ContentError> {
        match self {
            Self::Seed(list) => {
                tracing::debug!("Serving {} seed assignments", list.len());
                Ok(list.as_ref().clone())
            }
            Self::Remote(client) => client.fetch_assignments().await,
        }
    }

    /// One assignment by id.
    ///
    /// Remote documents have text ids, so a numeric id never matches there.
    pub async fn fetch_assignment(&self, id: &AssignmentId) -> Result<Option<Assignment>, ContentError> {
        match (self, id) {
            (Self::Seed(list), _) => Ok(list.iter().find(|a| &a.id == id).cloned()),
            (Self::Remote(client), AssignmentId::Text(doc_id)) => client.fetch_assignment(doc_id).await,
            (Self::Remote(_), AssignmentId::Number(_)) => Ok(None),
        }
    }
}
