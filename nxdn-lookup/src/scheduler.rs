//! Reload scheduler - periodic background refresh of the table
//!
//! One tokio task per scheduler. The task waits in short poll ticks, advances a
//! [`ReloadTimer`] and reloads the source whenever the timer runs out. Stopping
//! cancels a token that the task races against every tick, then joins the task.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;
use crate::table::TableStore;

/// Shortest poll tick the reload task accepts. A zero tick would never advance
/// the reload timer.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lifecycle of a [`ReloadScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, no task spawned (also the permanent state when reload is disabled)
    Idle,
    /// Background task is running
    Running,
    /// Stop requested, waiting for the task to exit
    Stopping,
    /// Task has exited, or stop was called before anything was started
    Stopped,
}

/// Countdown driven by explicit clock ticks rather than wall time.
#[derive(Debug, Clone)]
pub struct ReloadTimer {
    timeout: Duration,
    elapsed: Duration,
}

impl ReloadTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            elapsed: Duration::ZERO,
        }
    }

    /// Restart the countdown from the full timeout.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn clock(&mut self, tick: Duration) {
        self.elapsed = self.elapsed.saturating_add(tick);
    }

    pub fn has_expired(&self) -> bool {
        self.elapsed >= self.timeout
    }

    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.elapsed)
    }
}

/// Owns the background reload task of one lookup table.
pub struct ReloadScheduler {
    store: Arc<TableStore>,
    source: PathBuf,
    reload_interval: Duration,
    poll_interval: Duration,
    state: SchedulerState,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ReloadScheduler {
    /// `poll_interval` is raised to [`MIN_POLL_INTERVAL`] if shorter.
    pub fn new(
        store: Arc<TableStore>,
        source: impl Into<PathBuf>,
        reload_interval: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            source: source.into(),
            reload_interval,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            state: SchedulerState::Idle,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether this scheduler will ever spawn a task.
    pub fn is_enabled(&self) -> bool {
        !self.reload_interval.is_zero()
    }

    /// Spawn the reload task on the current tokio runtime.
    ///
    /// Returns false (and spawns nothing) when reload is disabled or the
    /// scheduler has already left `Idle`.
    pub fn start(&mut self) -> bool {
        if !self.is_enabled() || self.state != SchedulerState::Idle {
            return false;
        }

        let store = self.store.clone();
        let source = self.source.clone();
        let reload_interval = self.reload_interval;
        let poll_interval = self.poll_interval;
        let cancel = self.cancel.clone();

        self.handle = Some(tokio::spawn(async move {
            run_reload_loop(store, source, reload_interval, poll_interval, cancel).await;
        }));
        self.state = SchedulerState::Running;

        true
    }

    /// Cancel the reload task and wait for it to exit. Safe to call repeatedly.
    pub async fn stop(&mut self) {
        match self.state {
            SchedulerState::Stopped => return,
            SchedulerState::Idle => {
                self.state = SchedulerState::Stopped;
                return;
            }
            SchedulerState::Running | SchedulerState::Stopping => {}
        }

        self.state = SchedulerState::Stopping;
        self.cancel.cancel();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!("NXDN Id lookup reload task ended abnormally: {}", e);
            }
        }

        self.state = SchedulerState::Stopped;
    }
}

impl Drop for ReloadScheduler {
    fn drop(&mut self) {
        // Dropped without stop(): let the detached task wind down on its own.
        self.cancel.cancel();
    }
}

async fn run_reload_loop(
    store: Arc<TableStore>,
    source: PathBuf,
    reload_interval: Duration,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        path = %source.display(),
        interval_secs = reload_interval.as_secs(),
        "Started the NXDN Id lookup reload task"
    );

    let mut timer = ReloadTimer::new(reload_interval);
    timer.start();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(poll_interval) => {}
        }

        timer.clock(poll_interval);
        if !timer.has_expired() {
            continue;
        }

        match store.load(&source).await {
            Ok(_) => {}
            Err(e @ LoadError::EmptyResult { .. }) => {
                tracing::warn!("NXDN Id lookup table is now empty: {}", e);
            }
            // Already reported by the store; the stale table stays active.
            Err(LoadError::SourceUnavailable { .. }) => {}
        }
        timer.start();
        tracing::debug!(
            "Next NXDN Id lookup reload in {}s",
            timer.remaining().as_secs()
        );
    }

    tracing::info!("Stopped the NXDN Id lookup reload task");
}
