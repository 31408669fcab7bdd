//! `IdLookup` - the component handed to the gateway
//!
//! Ties the table store, the lookup handle and the reload scheduler together
//! behind the small API the gateway needs: initialize once, look up from any
//! thread, stop at shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::LookupConfig;
use crate::error::{ConfigError, LoadError};
use crate::lookup::CallsignLookup;
use crate::scheduler::{ReloadScheduler, SchedulerState};
use crate::table::{TableStats, TableStore};

/// Owning handle for one identifier table and its reload task.
pub struct IdLookup {
    source: PathBuf,
    store: Arc<TableStore>,
    lookup: CallsignLookup,
    scheduler: ReloadScheduler,
}

impl IdLookup {
    /// Create an empty lookup. Nothing is read until [`IdLookup::initialize`].
    ///
    /// A zero `reload_interval` disables background reloading. The stop request
    /// is checked at the default one second tick.
    pub fn new(source: impl Into<PathBuf>, reload_interval: Duration) -> Self {
        let poll_interval = LookupConfig::default().poll_interval();
        Self::with_intervals(source.into(), reload_interval, poll_interval)
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_intervals(
            config.source.clone(),
            config.reload_interval(),
            config.poll_interval(),
        ))
    }

    fn with_intervals(source: PathBuf, reload_interval: Duration, poll_interval: Duration) -> Self {
        let store = Arc::new(TableStore::new());
        let scheduler = ReloadScheduler::new(
            store.clone(),
            source.clone(),
            reload_interval,
            poll_interval,
        );

        Self {
            source,
            lookup: CallsignLookup::new(store.clone()),
            store,
            scheduler,
        }
    }

    /// Load the source once, then start periodic reloading if it is enabled.
    ///
    /// Returns whether the first load produced a non-empty table. The reload
    /// task is started either way so a source that shows up later is picked up.
    /// Must be called from within a tokio runtime.
    pub async fn initialize(&mut self) -> bool {
        let loaded = self.reload_now().await.is_ok();

        if !self.scheduler.is_enabled() {
            tracing::debug!("NXDN Id lookup reload disabled");
        }
        self.scheduler.start();

        loaded
    }

    /// Reload the source immediately, outside the regular schedule.
    pub async fn reload_now(&self) -> Result<usize, LoadError> {
        self.store.load(&self.source).await
    }

    pub fn find(&self, id: u32) -> String {
        self.lookup.find(id)
    }

    pub fn exists(&self, id: u32) -> bool {
        self.lookup.exists(id)
    }

    /// A read handle that can be moved to other threads.
    pub fn lookup(&self) -> CallsignLookup {
        self.lookup.clone()
    }

    pub fn stats(&self) -> TableStats {
        self.store.stats()
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Stop the reload task and wait for it to exit. A no-op when reloading is
    /// disabled or the lookup was already stopped.
    pub async fn stop(&mut self) {
        self.scheduler.stop().await;
    }
}
