//! Tracker session for Duetrack presentation layers.
//!
//! `TrackerSession` ties the core engines to a content source and a store:
//! it loads and reconciles assignments, applies toggles and view changes,
//! and serves the filtered list and dashboard stats.

pub mod error;
pub mod loader;
pub mod session;
pub mod view;

pub use error::LoadError;
pub use loader::{fetch_with_deadline, request_load, LoadMessage, LoadTicket};
pub use session::{LoadState, TrackerSession};
pub use view::ViewState;
