// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use cast_core::{KeyStore, SystemClock};
use fs2::FileExt;
use tokio::net::UnixListener;
use tracing::info;

use crate::controller::{Controller, ControllerParts};
use crate::monitor::{MonitorConfig, TitleLog, TitleLogFile};
use crate::remote::{HttpStatusSource, StatusParser};
use crate::settings::Settings;
use crate::supervisor::{SweepPolicy, Supervisor};
use crate::title_push::TitlePusher;

use super::{Config, DaemonState, LifecycleError, StartupResult};

/// Start the daemon
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // On LockFailed the files belong to the running daemon
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create state directory (needed for socket, lock, etc.)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Open without truncating so a running daemon's PID survives a failed attempt.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Create directories
    std::fs::create_dir_all(&config.run_dir)?;
    std::fs::create_dir_all(&config.logs_dir)?;

    // 4. Settings
    let settings = Settings::load(&config.settings_path)?;
    info!(path = %config.settings_path.display(), "settings loaded");

    // 5. Supervisor, reconciled against what survived the last daemon
    let supervisor = Supervisor::new(
        config.run_dir.clone(),
        config.logs_dir.clone(),
        settings.commands.workdir(&config.state_dir),
        SweepPolicy::from_settings(&settings.sweep)?,
    );
    let stale = supervisor.reconcile();
    if !stale.is_empty() {
        info!(count = stale.len(), "removed stale PID records");
    }

    // 6. Status monitor inputs
    let monitor = &settings.monitor;
    let parser = StatusParser::new(&monitor.online_phrase, &monitor.title_label)?;
    let source = HttpStatusSource::new(&monitor.status_url, monitor.fetch_timeout(), parser)?;
    let titles = TitleLog::open(
        TitleLogFile::new(config.title_log_path.clone(), monitor.log_max_bytes, monitor.keep_bytes()),
        monitor.ring_capacity,
    );
    let monitor_config = MonitorConfig {
        interval: crate::env::monitor_interval().unwrap_or_else(|| monitor.interval()),
        fetch_timeout: monitor.fetch_timeout(),
    };

    // 7. Controller; the monitor starts exactly once, here
    let controller = Arc::new(Controller::new(ControllerParts {
        supervisor,
        keys: KeyStore::new(config.keys_path.clone()),
        commands: settings.commands.command_config(&config.state_dir),
        status_source: Arc::new(source),
        titles: Arc::new(titles),
        pusher: TitlePusher::from_settings(&settings.title_push),
        monitor: monitor_config,
        clock: SystemClock,
    }));
    controller.start_monitor();

    // 8. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = match UnixListener::bind(&config.socket_path) {
        Ok(listener) => listener,
        Err(e) => {
            controller.shutdown().await;
            return Err(LifecycleError::BindFailed(config.socket_path.clone(), e));
        }
    };

    info!(socket = %config.socket_path.display(), "Daemon started");

    Ok(StartupResult {
        daemon: DaemonState { config: config.clone(), lock_file, controller, start_time: Instant::now() },
        listener,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
