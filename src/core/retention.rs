//! Periodic removal of stale orders
//!
//! The sweeper deletes every order created before `now - retention`. It runs
//! on its own schedule and talks to the store directly; it never touches the
//! cache or the catalog. A failed sweep is logged and the next tick tries
//! again.

use crate::core::clock::{Clock, SystemClock};
use crate::core::store::OrderStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Orders older than this are removed (7 days)
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Time between two sweeps (24 hours)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted time between two sweeps (365 days)
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Shortest accepted time between two sweeps
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Deletes orders older than the retention window
#[derive(Clone)]
pub struct RetentionSweeper {
    store: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
    retention: Duration,
    interval: Duration,
}

impl RetentionSweeper {
    /// Create a sweeper with the default retention, interval and system clock
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            retention: DEFAULT_RETENTION,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Oldest creation time kept by a sweep running at `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // A window reaching past the earliest representable time keeps everything
        chrono::Duration::from_std(self.retention)
            .ok()
            .and_then(|retention| now.checked_sub_signed(retention))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Run one sweep using the injected clock
    pub async fn sweep_once(&self) -> Option<u64> {
        self.sweep_at(self.clock.now()).await
    }

    /// Run one sweep as if the current time were `now`
    ///
    /// Returns the number of deleted orders, or `None` when the store failed.
    /// Failures are logged here and never propagated.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Option<u64> {
        let cutoff = self.cutoff(now);
        tracing::info!(cutoff = %cutoff, "Starting retention sweep");

        match self.store.delete_older_than(cutoff).await {
            Ok(count) => {
                tracing::info!(count, cutoff = %cutoff, "Retention sweep completed");
                Some(count)
            }
            Err(e) => {
                tracing::error!(error = %e, cutoff = %cutoff, "Retention sweep failed");
                None
            }
        }
    }

    /// Start sweeping every `interval` on the current tokio runtime
    ///
    /// The interval is clamped to [`MIN_SWEEP_INTERVAL`]..=[`MAX_SWEEP_INTERVAL`].
    /// The first sweep happens one full interval after the call. Missed ticks
    /// are skipped rather than replayed. Dropping the returned handle stops
    /// the loop as well.
    pub fn spawn(self) -> SweeperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let period = self.interval.clamp(MIN_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL);
        if period != self.interval {
            tracing::warn!(
                requested_secs = self.interval.as_secs(),
                interval_secs = period.as_secs(),
                "Sweep interval out of range, clamped"
            );
        }

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            interval.tick().await;

            tracing::info!(
                interval_secs = period.as_secs(),
                retention_secs = self.retention.as_secs(),
                "Retention sweeper started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.sweep_once().await;
                    }
                    _ = stop_rx.changed() => {
                        break;
                    }
                }
            }

            tracing::info!("Retention sweeper stopped");
        });

        SweeperHandle { stop_tx, task }
    }
}

/// Handle to a running sweeper task
pub struct SweeperHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the task to finish
    ///
    /// A sweep already in progress completes before the task exits.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Retention sweeper task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
