//! Background assignment loading.
//!
//! A load is identified by its generation. The session only applies the
//! result of its newest load, so a slow fetch that finishes after a newer
//! one (or after the session closed) is dropped.

use std::sync::mpsc::Sender;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use duetrack_content::ContentSource;
use duetrack_core::Assignment;

use crate::error::LoadError;

/// Identity and cancellation handle of one load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    token: CancellationToken,
}

impl LoadTicket {
    pub(crate) fn new(generation: u64, token: CancellationToken) -> Self {
        Self { generation, token }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Outcome of a load, delivered back to the session.
#[derive(Debug)]
pub struct LoadMessage {
    pub generation: u64,
    pub result: Result<Vec<Assignment>, LoadError>,
}

/// Fetch from `source`, giving up after `deadline` or when `token` fires.
pub async fn fetch_with_deadline(
    source: &ContentSource,
    deadline: Duration,
    token: &CancellationToken,
) -> Result<Vec<Assignment>, LoadError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(LoadError::Cancelled),
        fetched = tokio::time::timeout(deadline, source.fetch_assignments()) => match fetched {
            Ok(result) => result.map_err(LoadError::from),
            Err(_) => Err(LoadError::TimedOut(deadline)),
        },
    }
}

/// Run a load on `runtime` and send the outcome on `tx`.
///
/// For callers that poll a channel from a non-async thread.
pub fn request_load(
    runtime: &Handle,
    tx: &Sender<LoadMessage>,
    source: ContentSource,
    ticket: LoadTicket,
    deadline: Duration,
) -> JoinHandle<()> {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = fetch_with_deadline(&source, deadline, ticket.token()).await;
        match &result {
            Ok(list) => tracing::debug!("Load {} fetched {} assignments", ticket.generation(), list.len()),
            Err(e) => tracing::debug!("Load {} failed: {}", ticket.generation(), e),
        }
        let message = LoadMessage {
            generation: ticket.generation(),
            result,
        };
        if tx.send(message).is_err() {
            tracing::debug!("Load {} finished after its receiver closed", ticket.generation());
        }
    })
}
