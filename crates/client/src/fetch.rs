//! The resilient fetch cycle.
//!
//! One request is raced against a timeout. A response is transformed into
//! display data; an error or a timeout yields the fallback instead. The
//! caller always gets data, and the loading flag is cleared however the
//! cycle ends. There is no retry: the next scheduled cycle is the retry.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::ApiClient;
use sleepdash_core::dashboard::DashboardStats;

/// Why a cycle fell back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No response within the timeout.
    Timeout(Duration),
    /// The request failed.
    Failed(String),
}

impl Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout(after) => write!(f, "timed out after {}ms", after.as_millis()),
            Self::Failed(error) => write!(f, "request failed: {error}"),
        }
    }
}

/// Where displayed data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A live response.
    Live,
    /// The fallback, with the reason.
    Fallback(FallbackReason),
}

impl Source {
    /// Returns true for live data.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Result of one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// Display data.
    pub data: T,
    /// Origin of `data`.
    pub source: Source,
    /// When the cycle finished.
    pub fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    fn new(data: T, source: Source) -> Self {
        Self {
            data,
            source,
            fetched_at: Utc::now(),
        }
    }
}

/// Loading indicator that stays set while any cycle is in flight.
///
/// Clones share state. Observers can [`subscribe`](Self::subscribe).
#[derive(Debug, Clone)]
pub struct LoadingFlag {
    in_flight: Arc<AtomicUsize>,
    tx: Arc<watch::Sender<bool>>,
}

impl Default for LoadingFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingFlag {
    /// A cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            tx: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Returns true while at least one cycle is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Receives every change of the flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Sets the flag until the returned guard is dropped.
    #[must_use = "the flag clears when the guard is dropped"]
    pub fn begin(&self) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.tx.send_replace(true);
        }
        LoadingGuard { flag: self.clone() }
    }
}

/// Clears its [`LoadingFlag`] on drop, including when the cycle is
/// cancelled mid-request.
#[derive(Debug)]
pub struct LoadingGuard {
    flag: LoadingFlag,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.flag.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.flag.tx.send_replace(false);
        }
    }
}

/// Runs one fetch cycle.
///
/// `request` is polled for at most `timeout`. Its value goes through
/// `transform`; on error or timeout `fallback` supplies the data and the
/// failure is logged.
pub async fn fetch_with_fallback<R, E, T, Fut>(
    request: Fut,
    timeout: Duration,
    fallback: impl FnOnce() -> T,
    transform: impl FnOnce(R) -> T,
    loading: &LoadingFlag,
) -> Snapshot<T>
where
    Fut: Future<Output = Result<R, E>>,
    E: Display,
{
    let _guard = loading.begin();

    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(raw)) => {
            debug!("Fetch succeeded");
            Snapshot::new(transform(raw), Source::Live)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Fetch failed, showing fallback data");
            Snapshot::new(fallback(), Source::Fallback(FallbackReason::Failed(e.to_string())))
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis(), "Fetch timed out, showing fallback data");
            Snapshot::new(fallback(), Source::Fallback(FallbackReason::Timeout(timeout)))
        }
    }
}

/// One dashboard stats cycle against `client`.
pub async fn fetch_dashboard_stats(
    client: &ApiClient,
    timeout: Duration,
    loading: &LoadingFlag,
) -> Snapshot<DashboardStats> {
    fetch_with_fallback(
        client.dashboard_stats_raw(),
        timeout,
        DashboardStats::fallback,
        |raw| DashboardStats::from_raw(&raw),
        loading,
    )
    .await
}
