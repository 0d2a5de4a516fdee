// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal delivery and liveness probing.

use nix::errno::Errno;
use nix::sys::signal::{kill, killpg, Signal};
use nix::unistd::Pid;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{signal} to {scope} {pid} failed: {source}")]
pub struct SignalError {
    pub pid: u32,
    pub signal: &'static str,
    pub scope: &'static str,
    #[source]
    pub source: std::io::Error,
}

/// Handle on OS processes by pid.
///
/// `terminate` and `kill` address the whole process group led by `pgid`,
/// so helpers forked by the supervised command go down with it.
pub trait ProcessControl: Send + Sync {
    /// True if the process, or a process group with that id, exists,
    /// whether or not we may signal it.
    fn is_alive(&self, pid: u32) -> bool;

    /// Graceful termination of the group.
    fn terminate(&self, pgid: u32) -> Result<(), SignalError>;

    /// Forceful kill of the group.
    fn kill(&self, pgid: u32) -> Result<(), SignalError>;

    /// Graceful termination of a single process (stop sweep).
    fn terminate_one(&self, pid: u32) -> Result<(), SignalError>;
}

/// `ProcessControl` backed by POSIX signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixProcessControl;

/// Pids that would address more than one process (0, negatives) are refused.
fn to_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid).ok().filter(|p| *p > 0).map(Pid::from_raw)
}

fn deliver(pid: u32, signal: Signal, group: bool) -> Result<(), SignalError> {
    let scope = if group { "group" } else { "process" };
    let err = |errno: Errno| SignalError {
        pid,
        signal: signal.as_str(),
        scope,
        source: std::io::Error::from(errno),
    };
    let target = to_pid(pid).ok_or_else(|| err(Errno::EINVAL))?;
    let result = if group { killpg(target, signal) } else { kill(target, signal) };
    result.map_err(err)
}

/// Signal 0 result: delivered or refused both mean something is there.
fn exists(probe: nix::Result<()>) -> bool {
    matches!(probe, Ok(()) | Err(Errno::EPERM))
}

impl ProcessControl for UnixProcessControl {
    fn is_alive(&self, pid: u32) -> bool {
        let Some(target) = to_pid(pid) else {
            return false;
        };
        // A leader that exited may have left helpers running in its group
        exists(kill(target, None::<Signal>)) || exists(killpg(target, None::<Signal>))
    }

    fn terminate(&self, pgid: u32) -> Result<(), SignalError> {
        deliver(pgid, Signal::SIGTERM, true)
    }

    fn kill(&self, pgid: u32) -> Result<(), SignalError> {
        deliver(pgid, Signal::SIGKILL, true)
    }

    fn terminate_one(&self, pid: u32) -> Result<(), SignalError> {
        deliver(pid, Signal::SIGTERM, false)
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
