// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cast_core::{HostHealth, MonitorStats, RemoteStatus, TargetId, TargetStatus};
use serde::{Deserialize, Serialize};

/// Response from daemon to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Daemon is shutting down
    ShuttingDown,

    /// Per-target start outcomes, in request order
    Started { results: Vec<StartEntry> },

    /// Targets that were stopped
    Stopped { targets: Vec<TargetId> },

    /// Status of every target
    Status { targets: Vec<TargetEntry> },

    /// Tail of a target's log
    Log { target: TargetId, content: String },

    /// On-demand remote status check
    RemoteStatus { status: RemoteStatus },

    /// Title-change entries, newest first
    TitleChanges {
        entries: Vec<String>,
        /// Current monitor state; absent before the first poll
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<RemoteStatus>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stats: Option<MonitorStats>,
    },

    /// One result per control endpoint
    TitlePushed { results: Vec<PushResult> },

    /// Stored stream keys, masked
    Keys { keys: MaskedKeys },

    /// Host readout
    Health { health: HostHealth },

    /// Error response
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartEntry {
    pub target: TargetId,
    pub result: StartResult,
}

/// Outcome of starting one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartResult {
    Started { pid: u32 },
    AlreadyRunning { pid: u32 },
    MissingKey,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetEntry {
    pub target: TargetId,
    #[serde(flatten)]
    pub status: TargetStatus,
}

/// Result of pushing a title to one control endpoint.
///
/// Endpoints are attempted independently; each reports its own outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushResult {
    pub endpoint: String,
    pub ok: bool,
    /// "OK" on success, the failure detail otherwise
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MaskedKeys {
    pub key1: String,
    pub key2: String,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
