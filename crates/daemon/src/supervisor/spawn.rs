// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawning supervised commands as detached process groups.

use std::fs::OpenOptions;
use std::path::Path;
use std::process::Stdio;

use cast_core::TargetId;
use tracing::{info, warn};

use super::SupervisorError;

/// Spawn `argv` as the leader of a new process group with stdout and stderr
/// appended to `log_path`. Returns the pid, which is also the group id.
///
/// A reaper task collects the exit status so the pid stops probing as alive
/// as soon as the process is gone.
pub(super) fn spawn_group(
    target: TargetId,
    argv: &[String],
    log_path: &Path,
    workdir: &Path,
) -> Result<u32, SupervisorError> {
    let (program, args) = argv.split_first().ok_or(SupervisorError::EmptyCommand(target))?;
    let spawn_err = |source| SupervisorError::Spawn { target, source };

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(spawn_err)?;
    }
    let stdout = OpenOptions::new().create(true).append(true).open(log_path).map_err(spawn_err)?;
    let stderr = stdout.try_clone().map_err(spawn_err)?;

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .process_group(0)
        .kill_on_drop(false);

    let mut child = cmd.spawn().map_err(spawn_err)?;
    let pid = child.id().ok_or_else(|| {
        spawn_err(std::io::Error::other("spawned process exited before reporting a pid"))
    })?;

    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => info!(%target, pid, %status, "supervised process exited"),
            Err(e) => warn!(%target, pid, error = %e, "failed to reap supervised process"),
        }
    });

    Ok(pid)
}
