//! The presentation-facing tracker session.
//!
//! A session owns the in-memory assignment list, the persisted stats and the
//! view state. Everything the presentation layer shows is derived from those
//! on demand; every mutation goes through the store first.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use duetrack_content::ContentSource;
use duetrack_core::{
    calculate_priority, compute_stats, filter_and_sort, reconcile, toggle_status, Assignment,
    AssignmentId, Clock, DashboardStats, FilterType, LoadConfig, PersistedStore,
    PreferencesUpdate, Priority, SortBy, Stats, SystemClock, Theme, TrackerConfig, TrackerError,
    ViewMode,
};

use crate::loader::{self, LoadMessage, LoadTicket};
use crate::view::ViewState;

/// Where the session is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Showing the local list; no load started yet
    Idle,
    Loading { generation: u64 },
    /// Showing a freshly fetched, reconciled list
    Ready,
    /// The last load failed; showing the local list
    Degraded { reason: String },
    Closed,
}

pub struct TrackerSession {
    store: PersistedStore,
    source: ContentSource,
    clock: Arc<dyn Clock>,
    assignments: Vec<Assignment>,
    user_stats: Stats,
    view: ViewState,
    load_state: LoadState,
    generation: u64,
    in_flight: Option<LoadTicket>,
    shutdown: CancellationToken,
    fetch_timeout: Duration,
}

impl TrackerSession {
    /// Open a session over `store`.
    ///
    /// An empty store is initialized with default preferences and stats, plus
    /// the source's first-run assignments (if any).
    pub fn open(store: PersistedStore, source: ContentSource, clock: Arc<dyn Clock>) -> Self {
        let assignments = store.seed_if_empty(source.first_run_assignments());
        let prefs = store.preferences();
        let user_stats = store.stats();
        tracing::info!(
            "Opened session with {} local assignments ({} source)",
            assignments.len(),
            if source.is_remote() { "remote" } else { "seed" }
        );

        Self {
            store,
            source,
            clock,
            assignments,
            user_stats,
            view: ViewState::from_preferences(&prefs),
            load_state: LoadState::Idle,
            generation: 0,
            in_flight: None,
            shutdown: CancellationToken::new(),
            fetch_timeout: LoadConfig::default().fetch_timeout(),
        }
    }

    /// Open the store and remote source named in `config`, on the system clock.
    ///
    /// # Errors
    /// Returns an error if the store or the content client cannot be created.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let store = PersistedStore::from_config(&config.storage)?;
        let source = ContentSource::from_config(&config.content)?;
        Ok(Self::open(store, source, Arc::new(SystemClock)).with_fetch_timeout(config.load.fetch_timeout()))
    }

    /// Deadline for each load, retries included.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    // ---- Load lifecycle ----

    /// Start a new load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!("Superseding load {}", previous.generation());
            previous.cancel();
        }
        self.generation += 1;
        let ticket = LoadTicket::new(self.generation, self.shutdown.child_token());
        self.in_flight = Some(ticket.clone());
        self.load_state = LoadState::Loading {
            generation: self.generation,
        };
        tracing::info!("Loading assignments (load {})", self.generation);
        ticket
    }

    /// Apply the outcome of a load.
    ///
    /// Results from superseded loads, or arriving after `close`, are dropped
    /// and leave the session untouched. Returns whether the message applied.
    pub fn finish_load(&mut self, message: LoadMessage) -> bool {
        if self.is_closed() {
            tracing::debug!("Discarding load {}: session closed", message.generation);
            return false;
        }
        if message.generation != self.generation {
            tracing::debug!(
                "Discarding stale load {} (current is {})",
                message.generation,
                self.generation
            );
            return false;
        }
        self.in_flight = None;

        match message.result {
            Ok(fetched) => {
                let merged = reconcile(fetched, &self.assignments);
                if !self.store.save_assignments(&merged) {
                    tracing::warn!("Fetched assignments could not be saved; keeping them in memory");
                }
                tracing::info!("Loaded {} assignments", merged.len());
                self.assignments = merged;
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!("{}; showing {} local assignments", e, self.assignments.len());
                self.load_state = LoadState::Degraded {
                    reason: e.user_message(),
                };
            }
        }
        true
    }

    /// Load on the current task and apply the result.
    pub async fn load(&mut self) -> &LoadState {
        let ticket = self.begin_load();
        let source = self.source.clone();
        let result = loader::fetch_with_deadline(&source, self.fetch_timeout, ticket.token()).await;
        self.finish_load(LoadMessage {
            generation: ticket.generation(),
            result,
        });
        &self.load_state
    }

    /// Start a load on `runtime`; its outcome arrives on `tx` for `finish_load`.
    pub fn request_load(&mut self, runtime: &Handle, tx: &Sender<LoadMessage>) -> JoinHandle<()> {
        let ticket = self.begin_load();
        loader::request_load(runtime, tx, self.source.clone(), ticket, self.fetch_timeout)
    }

    /// Tear the session down; any load still in flight is cancelled and its
    /// result will be ignored.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.shutdown.cancel();
        self.in_flight = None;
        self.load_state = LoadState::Closed;
        tracing::info!("Session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.load_state == LoadState::Closed
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading { .. })
    }

    // ---- Mutations ----

    /// Flip completion of `id`. Returns `false` for an unknown id.
    pub fn toggle_status(&mut self, id: &AssignmentId) -> bool {
        let outcome = toggle_status(&self.store, id, &self.assignments, self.clock.now());
        if !outcome.changed {
            return false;
        }
        if !outcome.persisted {
            tracing::warn!("Toggle of {} not saved; change kept for this session", id);
        }
        self.assignments = outcome.assignments;
        self.user_stats = outcome.stats;
        true
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.view.search_term = term.into();
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.view.filter_type = filter_type;
        self.persist_view();
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.view.sort_by = sort_by;
        self.persist_view();
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view.view_mode = view_mode;
        self.persist_view();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.view.theme = theme;
        self.persist_view();
    }

    fn persist_view(&self) {
        let update = PreferencesUpdate::from(&self.view.preferences());
        if !self.store.save_preferences(update) {
            tracing::warn!("View preferences not saved");
        }
    }

    /// Wipe stored state and start over as on first run.
    pub fn reset(&mut self) -> bool {
        let cleared = self.store.clear();
        self.assignments = self.store.seed_if_empty(self.source.first_run_assignments());
        self.user_stats = self.store.stats();
        self.view = ViewState::from_preferences(&self.store.preferences());
        cleared
    }

    // ---- Derived views ----

    /// The list as the user should see it: searched, filtered and sorted.
    pub fn filtered_assignments(&self) -> Vec<Assignment> {
        filter_and_sort(&self.assignments, &self.view.criteria(), self.clock.now())
    }

    /// Dashboard counters for the full list.
    pub fn stats(&self) -> DashboardStats {
        compute_stats(&self.assignments, &self.user_stats, self.clock.now())
    }

    /// Persisted completion counters and streaks.
    pub fn user_stats(&self) -> &Stats {
        &self.user_stats
    }

    pub fn priority_of(&self, assignment: &Assignment) -> Priority {
        calculate_priority(&assignment.due_date, self.clock.now())
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    pub fn store(&self) -> &PersistedStore {
        &self.store
    }
}

impl Drop for TrackerSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for TrackerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSession")
            .field("store", &self.store)
            .field("assignments", &self.assignments.len())
            .field("load_state", &self.load_state)
            .field("generation", &self.generation)
            .finish()
    }
}
