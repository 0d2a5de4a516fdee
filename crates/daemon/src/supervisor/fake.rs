// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory process control and process table for tests.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::{ProcessControl, ProcessInfo, ProcessTable, SignalError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentSignal {
    Terminate(u32),
    Kill(u32),
    TerminateOne(u32),
}

#[derive(Default)]
pub struct FakeProcessControl {
    alive: Mutex<HashSet<u32>>,
    ignores_term: Mutex<HashSet<u32>>,
    sent: Mutex<Vec<SentSignal>>,
    fail_signals: Mutex<bool>,
}

impl FakeProcessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_alive(&self, pid: u32) {
        self.alive.lock().insert(pid);
    }

    /// `pid` survives graceful termination and only dies on kill.
    pub fn ignore_term(&self, pid: u32) {
        self.ignores_term.lock().insert(pid);
    }

    /// Every signal fails (the process state still changes).
    pub fn fail_signals(&self) {
        *self.fail_signals.lock() = true;
    }

    pub fn sent(&self) -> Vec<SentSignal> {
        self.sent.lock().clone()
    }

    fn record(&self, signal: SentSignal, pid: u32, name: &'static str) -> Result<(), SignalError> {
        self.sent.lock().push(signal);
        if *self.fail_signals.lock() {
            return Err(SignalError {
                pid,
                signal: name,
                scope: "fake",
                source: std::io::Error::other("injected failure"),
            });
        }
        Ok(())
    }
}

impl ProcessControl for FakeProcessControl {
    fn is_alive(&self, pid: u32) -> bool {
        self.alive.lock().contains(&pid)
    }

    fn terminate(&self, pgid: u32) -> Result<(), SignalError> {
        if !self.ignores_term.lock().contains(&pgid) {
            self.alive.lock().remove(&pgid);
        }
        self.record(SentSignal::Terminate(pgid), pgid, "SIGTERM")
    }

    fn kill(&self, pgid: u32) -> Result<(), SignalError> {
        self.alive.lock().remove(&pgid);
        self.record(SentSignal::Kill(pgid), pgid, "SIGKILL")
    }

    fn terminate_one(&self, pid: u32) -> Result<(), SignalError> {
        self.alive.lock().remove(&pid);
        self.record(SentSignal::TerminateOne(pid), pid, "SIGTERM")
    }
}

#[derive(Default)]
pub struct FakeProcessTable {
    rows: Mutex<Vec<ProcessInfo>>,
}

impl FakeProcessTable {
    pub fn new(rows: Vec<ProcessInfo>) -> Self {
        Self { rows: Mutex::new(rows) }
    }
}

impl ProcessTable for FakeProcessTable {
    fn list(&self) -> Vec<ProcessInfo> {
        self.rows.lock().clone()
    }
}
