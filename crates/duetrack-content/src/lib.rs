//! Assignment content sources for Duetrack.
//!
//! Provides the remote query client for the headless CMS that publishes
//! assignments, the built-in seed list, and `ContentSource`, which lets the
//! session load from either.

pub mod client;
pub mod error;
pub mod retry;
pub mod seed;
pub mod source;
pub mod types;

pub use client::{ContentClient, ALL_ASSIGNMENTS_QUERY, ASSIGNMENT_BY_ID_QUERY};
pub use error::ContentError;
pub use retry::{with_retry, RetryConfig, RetryDecision};
pub use seed::seed_assignments;
pub use source::ContentSource;
pub use types::{AssignmentDocument, QueryResponse};
