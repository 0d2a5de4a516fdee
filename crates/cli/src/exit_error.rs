// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying a process exit code.
//!
//! Commands whose output already explains a partial failure (a target that
//! did not start, an endpoint that refused a title) return a silent
//! `ExitError` so `main()` exits non-zero without printing again.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    /// Exit with `code` after the command has printed its own report.
    pub fn silent(code: i32) -> Self {
        Self { code, message: String::new() }
    }
}
