//! Dashboard view state.
//!
//! A [`DashboardView`] publishes the latest stats snapshot through a
//! `watch` channel. Each refresh cycle takes a sequence number and its
//! result is applied only if no newer cycle has applied first, so a slow
//! response never replaces fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use sleepdash_core::dashboard::{ActivityFeed, DashboardStats};
use tokio::sync::watch;
use tracing::debug;

use crate::ApiClient;
use crate::fetch::{LoadingFlag, Snapshot, Source, fetch_dashboard_stats};
use crate::refresher::{PeriodicRefresher, RefreshHandle};

/// What the dashboard currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Headline counters.
    pub stats: DashboardStats,
    /// Recent activity list.
    pub activities: ActivityFeed,
    /// Origin of `stats`. `None` until the first cycle completes.
    pub source: Option<Source>,
    /// When `stats` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
    /// Sequence number of the cycle that produced `stats`.
    pub sequence: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            stats: DashboardStats::default(),
            activities: ActivityFeed::canned(),
            source: None,
            updated_at: None,
            sequence: 0,
        }
    }
}

struct ViewInner {
    client: ApiClient,
    timeout: Duration,
    state: watch::Sender<ViewState>,
    loading: LoadingFlag,
    next_seq: AtomicU64,
}

impl ViewInner {
    async fn refresh(&self) -> bool {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = fetch_dashboard_stats(&self.client, self.timeout, &self.loading).await;
        self.apply(seq, snapshot)
    }

    fn apply(&self, seq: u64, snapshot: Snapshot<DashboardStats>) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if seq <= state.sequence {
                return false;
            }
            state.stats = snapshot.data;
            state.activities = ActivityFeed::canned();
            state.source = Some(snapshot.source);
            state.updated_at = Some(snapshot.fetched_at);
            state.sequence = seq;
            true
        });
        if !applied {
            debug!(seq, "Discarded stale refresh result");
        }
        applied
    }
}

/// The dashboard page: owns its state and at most one refresher.
pub struct DashboardView {
    inner: Arc<ViewInner>,
    refresher: Mutex<Option<RefreshHandle>>,
}

impl std::fmt::Debug for DashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardView")
            .field("timeout", &self.inner.timeout)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl DashboardView {
    /// Creates an inactive view. Each request is bounded by `timeout`.
    #[must_use]
    pub fn new(client: ApiClient, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ViewInner {
                client,
                timeout,
                state: watch::Sender::new(ViewState::default()),
                loading: LoadingFlag::new(),
                next_seq: AtomicU64::new(0),
            }),
            refresher: Mutex::new(None),
        }
    }

    /// Runs one fetch cycle now.
    ///
    /// Returns false if a newer cycle had already applied its result.
    pub async fn refresh(&self) -> bool {
        self.inner.refresh().await
    }

    /// Starts refreshing now and then every `period`. An existing refresher
    /// is stopped first.
    pub fn activate(&self, period: Duration) {
        let inner = Arc::clone(&self.inner);
        let handle = PeriodicRefresher::start(
            move || {
                let inner = Arc::clone(&inner);
                async move {
                    inner.refresh().await;
                }
            },
            period,
        );

        let previous = self.slot().replace(handle);
        if let Some(previous) = previous {
            debug!("Replacing running refresher");
            previous.stop();
        }
    }

    /// Stops the refresher. Does nothing if none is running.
    pub fn deactivate(&self) {
        if let Some(handle) = self.slot().take() {
            handle.stop();
        }
    }

    /// Returns true while a refresher is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot().as_ref().is_some_and(RefreshHandle::is_running)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Receives every applied snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Returns true while a cycle is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.is_loading()
    }

    /// Receives every change of the loading flag.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<RefreshHandle>> {
        self.refresher.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.deactivate();
    }
}
