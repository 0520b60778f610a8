//! Merge-on-load between fetched content and local completion state.
//!
//! The content source decides which assignments exist and what they say;
//! local state only contributes completion status.

use std::collections::HashMap;

use crate::model::{Assignment, AssignmentId, AssignmentStatus};

/// Overlay local statuses onto a freshly fetched list.
///
/// The result has exactly the remote items in remote order. Each takes the
/// status of the first local item with the same id, or `pending` if there is
/// none. Local-only items are dropped.
pub fn reconcile(remote: Vec<Assignment>, local: &[Assignment]) -> Vec<Assignment> {
    let mut known: HashMap<&AssignmentId, AssignmentStatus> = HashMap::with_capacity(local.len());
    for item in local {
        known.entry(&item.id).or_insert(item.status);
    }

    let merged: Vec<Assignment> = remote
        .into_iter()
        .map(|mut item| {
            item.status = known
                .get(&item.id)
                .copied()
                .unwrap_or(AssignmentStatus::Pending);
            item
        })
        .collect();

    tracing::debug!(
        "Reconciled {} fetched assignments against {} local",
        merged.len(),
        local.len()
    );
    merged
}
