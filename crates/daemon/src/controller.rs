// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations exposed to the control surface.
//!
//! The controller owns the supervisor, key store, status source, title log
//! and the single status monitor task. Listener handlers call into it and
//! map the results onto wire responses.

use std::sync::{Arc, OnceLock};

use cast_core::{build_command, Clock, CommandConfig, CommandError, CredentialError, KeyStore};
use cast_core::{HostHealth, Keys, RemoteStatus, TargetId};
use cast_wire::{MaskedKeys, PushResult, StartEntry, StartResult, TargetEntry};
use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::health;
use crate::monitor::{MonitorConfig, MonitorHandle, MonitorSnapshot, TitleLog};
use crate::remote::StatusSource;
use crate::supervisor::{StartOutcome, Supervisor, SupervisorError};
use crate::title_push::{PushError, TitlePusher};

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("title push failed: {0}")]
    Push(#[from] PushError),

    #[error("failed to clear title log: {0}")]
    TitleLog(#[source] std::io::Error),
}

/// Everything a controller is built from.
pub struct ControllerParts<C: Clock> {
    pub supervisor: Supervisor,
    pub keys: KeyStore,
    pub commands: CommandConfig,
    pub status_source: Arc<dyn StatusSource>,
    pub titles: Arc<TitleLog>,
    pub pusher: TitlePusher,
    pub monitor: MonitorConfig,
    pub clock: C,
}

pub struct Controller<C: Clock> {
    supervisor: Supervisor,
    keys: KeyStore,
    commands: CommandConfig,
    status_source: Arc<dyn StatusSource>,
    titles: Arc<TitleLog>,
    pusher: TitlePusher,
    monitor_config: MonitorConfig,
    monitor: OnceLock<MonitorHandle>,
    clock: C,
}

impl<C: Clock> Controller<C> {
    pub fn new(parts: ControllerParts<C>) -> Self {
        Self {
            supervisor: parts.supervisor,
            keys: parts.keys,
            commands: parts.commands,
            status_source: parts.status_source,
            titles: parts.titles,
            pusher: parts.pusher,
            monitor_config: parts.monitor,
            monitor: OnceLock::new(),
            clock: parts.clock,
        }
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Start each target in order. `key` overrides the stored key for every
    /// YouTube target in the request; radio ignores keys.
    pub async fn start(
        &self,
        targets: &[TargetId],
        key: Option<&str>,
    ) -> Result<Vec<StartEntry>, ControlError> {
        let override_key = key.map(str::trim).filter(|k| !k.is_empty());
        let needs_keys = targets.iter().any(|t| t.key_slot().is_some());
        let stored = match override_key {
            None if needs_keys => self.keys.read()?,
            _ => Keys::default(),
        };

        let mut results = Vec::with_capacity(targets.len());
        for target in dedup(targets) {
            let key = override_key.or_else(|| stored.for_target(target));
            let result = match self.start_one(target, key).await {
                Ok(StartOutcome::Started { pid }) => StartResult::Started { pid },
                Ok(StartOutcome::AlreadyRunning { pid }) => StartResult::AlreadyRunning { pid },
                Ok(StartOutcome::MissingKey) => StartResult::MissingKey,
                Err(e) => {
                    warn!(%target, error = %e, "start failed");
                    StartResult::Failed { error: e.to_string() }
                }
            };
            results.push(StartEntry { target, result });
        }
        Ok(results)
    }

    /// A missing key is reported before the running check, so a keyless
    /// start never touches the process table.
    async fn start_one(
        &self,
        target: TargetId,
        key: Option<&str>,
    ) -> Result<StartOutcome, SupervisorError> {
        let argv = match build_command(target, key, &self.commands) {
            Ok(argv) => argv,
            Err(CommandError::MissingKey(_)) => {
                info!(%target, "start refused, stream key is empty");
                return Ok(StartOutcome::MissingKey);
            }
        };
        self.supervisor.start(target, &argv).await
    }

    /// Stop every requested target; stops for different targets run
    /// concurrently.
    pub async fn stop(&self, targets: &[TargetId]) -> Vec<TargetId> {
        let targets = dedup(targets);
        join_all(targets.iter().map(|t| self.supervisor.stop(*t))).await;
        targets
    }

    pub fn status(&self) -> Vec<TargetEntry> {
        TargetId::ALL
            .into_iter()
            .map(|target| TargetEntry { target, status: self.supervisor.status(target) })
            .collect()
    }

    pub fn tail_log(&self, target: TargetId, lines: usize) -> String {
        self.supervisor.tail_log(target, lines)
    }

    pub fn clear_log(&self, target: TargetId) {
        self.supervisor.clear_log(target);
    }

    /// On-demand check, independent of the monitor. Failures read as offline.
    pub async fn fetch_remote_status(&self) -> RemoteStatus {
        match self.status_source.fetch().await {
            Ok(status) => status,
            Err(e) => {
                debug!(error = %e, "on-demand status fetch failed");
                RemoteStatus::offline()
            }
        }
    }

    pub async fn host_health(&self) -> HostHealth {
        health::snapshot(self.clock.epoch_ms()).await
    }

    /// Up to `limit` title-change entries, newest first.
    pub fn recent_title_changes(&self, limit: usize) -> Vec<String> {
        self.titles.recent(limit)
    }

    /// Latest monitor state, if the monitor has been started.
    pub fn monitor_snapshot(&self) -> Option<MonitorSnapshot> {
        self.monitor.get().map(MonitorHandle::snapshot)
    }

    pub fn clear_title_log(&self) -> Result<(), ControlError> {
        self.titles.clear().map_err(ControlError::TitleLog)?;
        info!("title log cleared");
        Ok(())
    }

    pub async fn push_title(&self, title: &str) -> Result<Vec<PushResult>, ControlError> {
        Ok(self.pusher.push(title).await?)
    }

    pub fn save_keys(&self, key1: &str, key2: &str) -> Result<(), ControlError> {
        let keys = Keys { key1: key1.trim().to_string(), key2: key2.trim().to_string() };
        self.keys.write(&keys)?;
        info!(path = %self.keys.path().display(), "stream keys saved");
        Ok(())
    }

    pub fn show_keys(&self) -> Result<MaskedKeys, ControlError> {
        let masked = self.keys.read()?.masked();
        Ok(MaskedKeys { key1: masked.key1, key2: masked.key2 })
    }

    /// Launch the status monitor. Only the first call starts a task;
    /// returns whether this call did.
    pub fn start_monitor(&self) -> bool {
        let mut started = false;
        self.monitor.get_or_init(|| {
            started = true;
            MonitorHandle::spawn(
                Arc::clone(&self.status_source),
                Arc::clone(&self.titles),
                self.clock.clone(),
                self.monitor_config,
            )
        });
        started
    }

    /// Stop the monitor task. Supervised processes keep running.
    pub async fn shutdown(&self) {
        if let Some(monitor) = self.monitor.get() {
            monitor.shutdown().await;
        }
    }
}

/// Targets in first-seen order without repeats.
fn dedup(targets: &[TargetId]) -> Vec<TargetId> {
    let mut seen = Vec::with_capacity(targets.len());
    for target in targets {
        if !seen.contains(target) {
            seen.push(*target);
        }
    }
    seen
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
