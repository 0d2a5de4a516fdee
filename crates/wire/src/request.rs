// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cast_core::TargetId;
use serde::{Deserialize, Serialize};

/// Request from CLI to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Start one or more targets
    Start {
        targets: Vec<TargetId>,
        /// Stream key override; the key store is used when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Stop one or more targets (always succeeds)
    Stop { targets: Vec<TargetId> },

    /// Status of every target
    Status,

    /// Last `lines` lines of a target's log
    TailLog { target: TargetId, lines: usize },

    /// Empty a target's log
    ClearLog { target: TargetId },

    /// Fetch the remote station status now, bypassing the monitor
    RemoteStatus,

    /// Recent title-change entries, newest first
    TitleChanges {
        limit: usize,
        /// Include monitor counters
        #[serde(default)]
        stats: bool,
    },

    /// Empty the title-change log (memory and disk)
    ClearTitleLog,

    /// Push a new title to the audio engine control ports
    PushTitle { title: String },

    /// Replace the stored stream keys
    SaveKeys { key1: String, key2: String },

    /// Show stored stream keys (masked)
    ShowKeys,

    /// Host CPU, memory, disk and network readout
    Health,

    /// Request daemon shutdown
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
