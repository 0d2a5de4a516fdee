// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cast_core::SystemClock;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::controller::Controller;
use crate::remote::FetchError;
use crate::settings::SettingsError;

/// Controller as run by the daemon
pub type DaemonController = Controller<SystemClock>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/cast)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// PID records of supervised targets
    pub run_dir: PathBuf,
    /// Output logs of supervised targets
    pub logs_dir: PathBuf,
    /// Stream key file
    pub keys_path: PathBuf,
    /// On-disk title-change log
    pub title_log_path: PathBuf,
    /// Settings file (may not exist)
    pub settings_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Uses fixed paths under `~/.local/state/cast/` (or `$XDG_STATE_HOME/cast/`).
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = crate::env::state_dir()?;
        let settings_path =
            crate::env::config_path().unwrap_or_else(|| state_dir.join("cast.toml"));
        Ok(Self::with_settings(state_dir, settings_path))
    }

    /// Paths rooted at `state_dir`, settings at `<state_dir>/cast.toml`.
    pub fn for_state_dir(state_dir: &Path) -> Self {
        Self::with_settings(state_dir.to_path_buf(), state_dir.join("cast.toml"))
    }

    fn with_settings(state_dir: PathBuf, settings_path: PathBuf) -> Self {
        Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            run_dir: state_dir.join("run"),
            logs_dir: state_dir.join("logs"),
            keys_path: state_dir.join("keys.env"),
            title_log_path: state_dir.join("title_changes.log"),
            settings_path,
            state_dir,
        }
    }
}

/// Daemon state during operation.
///
/// The listener is returned separately from startup to be spawned as a Listener task.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Shared with the listener
    pub controller: Arc<DaemonController>,
    pub start_time: Instant,
}

/// Result of daemon startup - includes both the daemon state and the listener.
pub struct StartupResult {
    pub daemon: DaemonState,
    /// The Unix socket listener to spawn as a task
    pub listener: UnixListener,
}

impl DaemonState {
    /// Shutdown the daemon gracefully.
    ///
    /// Supervised broadcast processes are left running; their PID records
    /// keep them tracked by the next daemon.
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Stop the status monitor
        self.controller.shutdown().await;

        // 2. Remove socket file (listener task stops when tokio runtime exits)
        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        // 3. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 4. Lock file is released automatically when self.lock_file is dropped

        info!(uptime_secs = self.start_time.elapsed().as_secs(), "Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Status page error: {0}")]
    StatusPage(#[from] FetchError),

    #[error("Status parser error: {0}")]
    StatusParser(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
