// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target log files: bounded tail reads and truncation.
//!
//! Writers are the spawned processes themselves (append mode); the daemon
//! only reads, truncates and stats these files.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

/// Size of each backward read.
const TAIL_BLOCK: u64 = 4096;

/// Last `lines` lines of the file at `path`, joined with `\n`.
///
/// Missing file reads as empty. Read failures come back as a
/// `(log read error: ...)` string rather than an error.
pub fn tail(path: &Path, lines: usize) -> String {
    if lines == 0 {
        return String::new();
    }
    match read_tail(path, lines) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => format!("(log read error: {})", e),
    }
}

/// `tail` with the error left to the caller.
pub(crate) fn read_tail(path: &Path, lines: usize) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut pos = file.seek(SeekFrom::End(0))?;
    let mut data: Vec<u8> = Vec::new();

    while pos > 0 {
        let step = TAIL_BLOCK.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; step as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&data);
        data = chunk;

        if newlines_before_last_line(&data) >= lines {
            break;
        }
    }

    Ok(last_lines(&data, lines))
}

/// Newline count, not counting a terminator at the very end.
fn newlines_before_last_line(data: &[u8]) -> usize {
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    body.iter().filter(|b| **b == b'\n').count()
}

/// Last `n` lines of `data`. A trailing newline terminates the final line
/// rather than starting an empty one.
fn last_lines(data: &[u8], n: usize) -> String {
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    if body.is_empty() && data.len() <= 1 {
        return String::new();
    }
    let segments: Vec<&[u8]> = body.split(|b| *b == b'\n').collect();
    let start = segments.len().saturating_sub(n);
    let joined = segments[start..].join(&b'\n');
    String::from_utf8_lossy(&joined).into_owned()
}

/// Empty the file at `path`. Failures are logged and ignored.
pub fn truncate(path: &Path) {
    match std::fs::OpenOptions::new().write(true).truncate(true).open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => debug!(path = %path.display(), error = %e, "log truncate failed"),
    }
}

/// Milliseconds since the file was last modified, if it exists.
pub fn age_ms(path: &Path, now: SystemTime) -> Option<u64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(now.duration_since(modified).unwrap_or_default().as_millis() as u64)
}

#[cfg(test)]
#[path = "log_store_tests.rs"]
mod tests;
