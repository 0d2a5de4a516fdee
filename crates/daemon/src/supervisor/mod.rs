// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process supervisor: start, stop, status and reconciliation of targets.
//!
//! The PID record under `run/` is the only state. A record whose pid fails
//! the liveness probe is stale and reads as "not running".

mod process;
mod spawn;
mod sweep;

pub use process::{ProcessControl, SignalError, UnixProcessControl};
pub use sweep::{ProcessInfo, ProcessTable, SweepPolicy, SysinfoProcessTable};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use cast_core::{TargetId, TargetStatus};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::log_store;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("{0}: empty command")]
    EmptyCommand(TargetId),

    #[error("{target}: failed to spawn: {source}")]
    Spawn {
        target: TargetId,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write PID record {path}: {source}")]
    PidRecord {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { pid: u32 },
    AlreadyRunning { pid: u32 },
    MissingKey,
}

/// How long `stop` waits for a graceful exit before killing the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    pub poll_interval: Duration,
    pub poll_attempts: u32,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self { poll_interval: Duration::from_millis(100), poll_attempts: 20 }
    }
}

pub struct Supervisor {
    run_dir: PathBuf,
    log_dir: PathBuf,
    workdir: PathBuf,
    control: Arc<dyn ProcessControl>,
    table: Arc<dyn ProcessTable>,
    sweep: SweepPolicy,
    stop_policy: StopPolicy,
    /// Never swept; the daemon's own pid
    self_pid: u32,
    /// Serializes start/stop per target within this daemon
    locks: HashMap<TargetId, Mutex<()>>,
}

impl Supervisor {
    pub fn new(run_dir: PathBuf, log_dir: PathBuf, workdir: PathBuf, sweep: SweepPolicy) -> Self {
        Self {
            run_dir,
            log_dir,
            workdir,
            control: Arc::new(UnixProcessControl),
            table: Arc::new(SysinfoProcessTable),
            sweep,
            stop_policy: StopPolicy::default(),
            self_pid: std::process::id(),
            locks: TargetId::ALL.into_iter().map(|t| (t, Mutex::new(()))).collect(),
        }
    }

    pub fn with_control(mut self, control: Arc<dyn ProcessControl>) -> Self {
        self.control = control;
        self
    }

    pub fn with_table(mut self, table: Arc<dyn ProcessTable>) -> Self {
        self.table = table;
        self
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn pid_path(&self, target: TargetId) -> PathBuf {
        target.pid_path(&self.run_dir)
    }

    pub fn log_path(&self, target: TargetId) -> PathBuf {
        target.log_path(&self.log_dir)
    }

    /// Pid from the target's record, if the record parses and the process is alive.
    pub fn live_pid(&self, target: TargetId) -> Option<u32> {
        read_pid_record(&self.pid_path(target)).filter(|pid| self.control.is_alive(*pid))
    }

    /// Spawn `argv` for `target` unless a live PID record already exists.
    ///
    /// Spawn failures are returned; the caller decides how to report them.
    pub async fn start(
        &self,
        target: TargetId,
        argv: &[String],
    ) -> Result<StartOutcome, SupervisorError> {
        let _guard = self.lock(target).await;

        if let Some(pid) = self.live_pid(target) {
            debug!(%target, pid, "start skipped, already running");
            return Ok(StartOutcome::AlreadyRunning { pid });
        }

        let pid = spawn::spawn_group(target, argv, &self.log_path(target), &self.workdir)?;
        let pid_path = self.pid_path(target);
        if let Err(source) = write_pid_record(&pid_path, pid) {
            // Untracked processes cannot be stopped later; take it back down.
            let _ = self.control.kill(pid);
            return Err(SupervisorError::PidRecord { path: pid_path, source });
        }

        info!(%target, pid, "started");
        Ok(StartOutcome::Started { pid })
    }

    /// Converge `target` towards "not running". Never fails.
    ///
    /// TERM to the recorded group, poll, KILL if it outlives the poll
    /// window, sweep stray processes by command line, then remove the PID
    /// record and empty the log.
    pub async fn stop(&self, target: TargetId) {
        let _guard = self.lock(target).await;

        if let Some(pid) = self.live_pid(target) {
            self.stop_group(target, pid).await;
        }

        self.sweep(target).await;

        let pid_path = self.pid_path(target);
        match std::fs::remove_file(&pid_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(%target, path = %pid_path.display(), error = %e, "failed to remove PID record"),
        }

        log_store::truncate(&self.log_path(target));
        info!(%target, "stopped");
    }

    async fn stop_group(&self, target: TargetId, pid: u32) {
        if let Err(e) = self.control.terminate(pid) {
            debug!(%target, error = %e, "terminate failed");
        }

        for _ in 0..self.stop_policy.poll_attempts {
            if !self.control.is_alive(pid) {
                debug!(%target, pid, "exited after terminate");
                return;
            }
            tokio::time::sleep(self.stop_policy.poll_interval).await;
        }

        if self.control.is_alive(pid) {
            warn!(%target, pid, "still alive after terminate, killing group");
            if let Err(e) = self.control.kill(pid) {
                debug!(%target, error = %e, "kill failed");
            }
        }
    }

    async fn sweep(&self, target: TargetId) {
        let table = Arc::clone(&self.table);
        let processes = match tokio::task::spawn_blocking(move || table.list()).await {
            Ok(processes) => processes,
            Err(e) => {
                debug!(%target, error = %e, "process listing failed");
                return;
            }
        };

        for pid in self.sweep.select(target, &processes, self.self_pid) {
            match self.control.terminate_one(pid) {
                Ok(()) => info!(%target, pid, "swept stray process"),
                Err(e) => debug!(%target, error = %e, "sweep signal failed"),
            }
        }
    }

    /// Read-only view of the target: live pid and log age.
    pub fn status(&self, target: TargetId) -> TargetStatus {
        let pid = self.live_pid(target);
        TargetStatus {
            running: pid.is_some(),
            pid,
            log_age_ms: log_store::age_ms(&self.log_path(target), SystemTime::now()),
        }
    }

    pub fn tail_log(&self, target: TargetId, lines: usize) -> String {
        log_store::tail(&self.log_path(target), lines)
    }

    pub fn clear_log(&self, target: TargetId) {
        log_store::truncate(&self.log_path(target));
    }

    /// Remove PID records that are unparseable or point at dead processes.
    ///
    /// Returns the targets whose records were removed.
    pub fn reconcile(&self) -> Vec<TargetId> {
        let mut removed = Vec::new();
        for target in TargetId::ALL {
            let path = self.pid_path(target);
            if !path.exists() {
                continue;
            }
            let recorded = read_pid_record(&path);
            if recorded.is_some_and(|pid| self.control.is_alive(pid)) {
                info!(%target, pid = ?recorded, "recovered running target");
                continue;
            }
            warn!(%target, pid = ?recorded, "removing stale PID record");
            match std::fs::remove_file(&path) {
                Ok(()) => removed.push(target),
                Err(e) => warn!(%target, error = %e, "failed to remove stale PID record"),
            }
        }
        removed
    }

    async fn lock(&self, target: TargetId) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match self.locks.get(&target) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

/// Parse a PID record; missing or malformed records read as `None`.
fn read_pid_record(path: &Path) -> Option<u32> {
    let text = std::fs::read_to_string(path).ok()?;
    text.trim().parse::<u32>().ok().filter(|pid| *pid > 0)
}

fn write_pid_record(path: &Path, pid: u32) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, pid.to_string())
}

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
