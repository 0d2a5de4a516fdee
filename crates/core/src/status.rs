// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status values reported by the supervisor and the status monitor.

use serde::{Deserialize, Serialize};

/// One observation of the remote station status page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStatus {
    pub online: bool,
    /// Display title; empty when unknown
    #[serde(default)]
    pub title: String,
}

impl RemoteStatus {
    pub fn online(title: impl Into<String>) -> Self {
        Self { online: true, title: title.into() }
    }

    /// What a failed fetch is treated as.
    pub fn offline() -> Self {
        Self { online: false, title: String::new() }
    }
}

/// Derived view of one target: PID record plus log freshness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatus {
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Milliseconds since the log file was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_age_ms: Option<u64>,
}

/// Counters kept by the status monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Completed poll cycles
    pub cycles: u64,
    /// Cycles whose fetch failed and counted as offline
    pub fetch_failures: u64,
    /// Change entries recorded (including monitor error entries)
    pub entries: u64,
    /// Epoch ms of the last completed cycle, 0 before the first
    pub last_cycle_ms: u64,
}

/// Point-in-time host readout for the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostHealth {
    /// Epoch ms when the readout was taken
    pub time_ms: u64,
    pub cpu_percent: f32,
    pub ram_percent: f32,
    /// Usage of the filesystem mounted at `/`
    pub disk_percent: f32,
    /// Totals across all interfaces since boot
    pub net_bytes_sent: u64,
    pub net_bytes_recv: u64,
}
