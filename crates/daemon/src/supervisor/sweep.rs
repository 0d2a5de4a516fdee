// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line sweep for processes that escaped their group.

use std::collections::HashMap;

use cast_core::TargetId;
use regex::Regex;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use crate::settings::{SettingsError, SweepSettings};

/// One row of the OS process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Arguments joined with single spaces
    pub cmdline: String,
}

/// Snapshot source for the OS process table.
pub trait ProcessTable: Send + Sync {
    fn list(&self) -> Vec<ProcessInfo>;
}

/// `ProcessTable` backed by `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProcessTable;

impl ProcessTable for SysinfoProcessTable {
    fn list(&self) -> Vec<ProcessInfo> {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_cmd(UpdateKind::Always),
        );
        system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none() && !process.cmd().is_empty())
            .map(|(pid, process)| ProcessInfo {
                pid: pid.as_u32(),
                cmdline: process
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect()
    }
}

/// Per-target command-line patterns.
#[derive(Debug, Clone, Default)]
pub struct SweepPolicy {
    patterns: HashMap<TargetId, Vec<Regex>>,
}

impl SweepPolicy {
    pub fn new(patterns: impl IntoIterator<Item = (TargetId, Vec<Regex>)>) -> Self {
        Self { patterns: patterns.into_iter().collect() }
    }

    pub fn from_settings(settings: &SweepSettings) -> Result<Self, SettingsError> {
        let mut patterns = HashMap::new();
        for target in TargetId::ALL {
            let compiled = settings
                .patterns(target)
                .iter()
                .map(|p| Regex::new(p))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| SettingsError::Pattern { target, source })?;
            patterns.insert(target, compiled);
        }
        Ok(Self { patterns })
    }

    pub fn matches(&self, target: TargetId, cmdline: &str) -> bool {
        self.patterns.get(&target).is_some_and(|ps| ps.iter().any(|p| p.is_match(cmdline)))
    }

    /// Pids in `processes` whose command line matches `target`, never `exclude`.
    pub fn select(&self, target: TargetId, processes: &[ProcessInfo], exclude: u32) -> Vec<u32> {
        processes
            .iter()
            .filter(|p| p.pid != exclude && self.matches(target, &p.cmdline))
            .map(|p| p.pid)
            .collect()
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
