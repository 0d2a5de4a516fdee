// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status monitor: polls the remote status page and records changes.
//!
//! The monitor task owns the last observation. Readers get snapshots
//! through a watch channel and the shared [`TitleLog`].

mod debounce;
mod title_log;

pub use debounce::{change_message, UNKNOWN_TITLE};
pub use title_log::{format_entry, TitleLog, TitleLogFile, TRUNCATION_MARKER};

use std::sync::Arc;
use std::time::Duration;

use cast_core::{Clock, MonitorStats, RemoteStatus};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::remote::{FetchError, StatusSource};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("status fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("status fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("title log write failed: {0}")]
    Log(#[from] std::io::Error),
}

/// What readers see of the monitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorSnapshot {
    /// Last observation; `None` until the first cycle completes
    pub status: Option<RemoteStatus>,
    pub stats: MonitorStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub fetch_timeout: Duration,
}

/// Poll loop state. Owned by the monitor task.
pub struct Monitor<C: Clock> {
    source: Arc<dyn StatusSource>,
    log: Arc<TitleLog>,
    clock: C,
    config: MonitorConfig,
    last: Option<RemoteStatus>,
    stats: MonitorStats,
    tx: watch::Sender<MonitorSnapshot>,
}

impl<C: Clock> Monitor<C> {
    pub fn new(
        source: Arc<dyn StatusSource>,
        log: Arc<TitleLog>,
        clock: C,
        config: MonitorConfig,
    ) -> (Self, watch::Receiver<MonitorSnapshot>) {
        let (tx, rx) = watch::channel(MonitorSnapshot::default());
        let monitor =
            Self { source, log, clock, config, last: None, stats: MonitorStats::default(), tx };
        (monitor, rx)
    }

    /// One poll: fetch, debounce, record, publish. Never fails; errors are
    /// counted, logged and, for the title log, recorded as an entry.
    pub async fn cycle(&mut self) {
        let observed = match self.observe().await {
            Ok(status) => status,
            Err(e) => {
                debug!(error = %e, "remote status unavailable, treating as offline");
                self.stats.fetch_failures += 1;
                RemoteStatus::offline()
            }
        };

        if let Some(message) = change_message(self.last.as_ref(), &observed) {
            info!(change = %message, "remote status changed");
            if let Err(e) = self.record(&message) {
                warn!(error = %e, "monitor cycle error");
                let _ = self.record(&format!("Monitor error: {}", e));
            }
        }
        self.last = Some(observed);

        self.stats.cycles += 1;
        self.stats.last_cycle_ms = self.clock.epoch_ms();
        self.publish();
    }

    async fn observe(&self) -> Result<RemoteStatus, MonitorError> {
        match tokio::time::timeout(self.config.fetch_timeout, self.source.fetch()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(MonitorError::Timeout(self.config.fetch_timeout)),
        }
    }

    fn record(&mut self, message: &str) -> Result<(), MonitorError> {
        self.stats.entries += 1;
        let entry = format_entry(self.clock.epoch_ms(), message);
        self.log.record(entry)?;
        Ok(())
    }

    fn publish(&self) {
        let snapshot = MonitorSnapshot { status: self.last.clone(), stats: self.stats };
        self.tx.send_replace(snapshot);
    }

    /// Poll at the configured interval until `cancel` fires. The first
    /// poll happens immediately and only sets the baseline.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.cycle() => {}
            }
        }
        info!(cycles = self.stats.cycles, "status monitor stopped");
    }
}

/// Handle to a running monitor task.
pub struct MonitorHandle {
    snapshots: watch::Receiver<MonitorSnapshot>,
    log: Arc<TitleLog>,
    cancel: CancellationToken,
    task: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl MonitorHandle {
    /// Spawn the monitor task on the current runtime.
    pub fn spawn<C: Clock>(
        source: Arc<dyn StatusSource>,
        log: Arc<TitleLog>,
        clock: C,
        config: MonitorConfig,
    ) -> Self {
        let (monitor, snapshots) = Monitor::new(source, Arc::clone(&log), clock, config);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(monitor.run(cancel.clone()));
        info!(interval = ?config.interval, "status monitor started");
        Self { snapshots, log, cancel, task: parking_lot::Mutex::new(Some(task)) }
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshots.clone()
    }

    pub fn log(&self) -> &TitleLog {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the task and wait for it to finish.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "status monitor task ended abnormally");
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
