// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target registry: the fixed set of broadcast processes cast supervises.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One externally-spawned broadcast process.
///
/// Serializes as its short name (`"yta"`, `"ytb"`, `"radio"`), which is also
/// the stem of its PID and log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetId {
    /// Video relay to YouTube ingest endpoint A
    Yta,
    /// Video relay to YouTube ingest endpoint B
    Ytb,
    /// Audio streaming engine
    Radio,
}

/// Which credential a target needs from the key store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    Key1,
    Key2,
}

impl KeySlot {
    /// Variable name in the credentials file.
    pub fn var_name(self) -> &'static str {
        match self {
            KeySlot::Key1 => "KEY1",
            KeySlot::Key2 => "KEY2",
        }
    }
}

impl TargetId {
    pub const ALL: [TargetId; 3] = [TargetId::Yta, TargetId::Ytb, TargetId::Radio];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetId::Yta => "yta",
            TargetId::Ytb => "ytb",
            TargetId::Radio => "radio",
        }
    }

    /// Human-readable name for operator output.
    pub fn label(self) -> &'static str {
        match self {
            TargetId::Yta => "YouTube A",
            TargetId::Ytb => "YouTube B",
            TargetId::Radio => "Radio",
        }
    }

    pub fn key_slot(self) -> Option<KeySlot> {
        match self {
            TargetId::Yta => Some(KeySlot::Key1),
            TargetId::Ytb => Some(KeySlot::Key2),
            TargetId::Radio => None,
        }
    }

    /// Ingest endpoint letter for the YouTube relays.
    pub fn endpoint_letter(self) -> Option<&'static str> {
        match self {
            TargetId::Yta => Some("a"),
            TargetId::Ytb => Some("b"),
            TargetId::Radio => None,
        }
    }

    /// `<run_dir>/<id>.pid`
    pub fn pid_path(self, run_dir: &Path) -> PathBuf {
        run_dir.join(format!("{}.pid", self.as_str()))
    }

    /// `<log_dir>/<id>.log`
    pub fn log_path(self, log_dir: &Path) -> PathBuf {
        log_dir.join(format!("{}.log", self.as_str()))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target: {0} (expected one of: yta, ytb, radio)")]
pub struct ParseTargetError(pub String);

impl FromStr for TargetId {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yta" => Ok(TargetId::Yta),
            "ytb" => Ok(TargetId::Ytb),
            "radio" => Ok(TargetId::Radio),
            _ => Err(ParseTargetError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
