//! Periodic background refresh.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest period a refresher runs at.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Runs a task on a fixed period.
pub struct PeriodicRefresher;

impl PeriodicRefresher {
    /// Spawns a loop that runs `task` immediately and then every `period`.
    ///
    /// Ticks missed while a run is still going are skipped, so runs from
    /// one refresher never overlap. The loop ends when the returned handle
    /// is stopped or dropped. A `period` below [`MIN_PERIOD`] is raised to it.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start<F, Fut>(mut task: F, period: Duration) -> RefreshHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = if period < MIN_PERIOD {
            warn!(period_ms = period.as_millis(), "Refresh period too short, using minimum");
            MIN_PERIOD
        } else {
            period
        };
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(period_secs = period.as_secs(), "Periodic refresh started");

            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    () = task() => debug!("Refresh cycle finished"),
                }
            }

            info!("Periodic refresh stopped");
        });

        RefreshHandle {
            token,
            join: Some(join),
        }
    }
}

/// Owns a running refresher.
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct RefreshHandle {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stops the loop. A cycle in flight is abandoned.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Stops the loop and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }

    /// Returns true until the loop has been stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.join.as_ref().is_some_and(|j| !j.is_finished())
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
