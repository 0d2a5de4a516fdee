// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: CAST_STATE_DIR > XDG_STATE_HOME/cast > ~/.local/state/cast
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("CAST_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("cast"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/cast"))
}

/// Default IPC timeout
pub fn ipc_timeout() -> Duration {
    std::env::var("CAST_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Settings file override; defaults to `<state_dir>/cast.toml`
pub fn config_path() -> Option<PathBuf> {
    std::env::var("CAST_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Monitor poll interval override
pub fn monitor_interval() -> Option<Duration> {
    std::env::var("CAST_MONITOR_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
