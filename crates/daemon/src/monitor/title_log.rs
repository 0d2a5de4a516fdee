// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Title-change history: bounded ring in memory, size-capped file on disk.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use cast_core::format_local_timestamp;
use parking_lot::Mutex;

use crate::log_store;

/// First line of a capped file.
pub const TRUNCATION_MARKER: &str = "... [truncated] ...";

/// `[YYYY-MM-DD HH:MM:SS] message`, local time.
pub fn format_entry(epoch_ms: u64, message: &str) -> String {
    format!("[{}] {}", format_local_timestamp(epoch_ms), message)
}

/// Append-only entry file, rewritten to a tail window once it grows past
/// `max_bytes`.
#[derive(Debug, Clone)]
pub struct TitleLogFile {
    path: PathBuf,
    max_bytes: u64,
    keep_bytes: u64,
}

impl TitleLogFile {
    /// `keep_bytes` is clamped so the capped file (marker included) stays
    /// below `max_bytes`.
    pub fn new(path: PathBuf, max_bytes: u64, keep_bytes: u64) -> Self {
        let budget = max_bytes.saturating_sub(TRUNCATION_MARKER.len() as u64 + 2);
        Self { path, max_bytes, keep_bytes: keep_bytes.min(budget) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, capping the file first if it is over the limit.
    pub fn append(&self, entry: &str) -> std::io::Result<()> {
        self.cap()?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(format!("{}\n", entry).as_bytes())
    }

    /// Replace an oversized file with the marker and its last whole lines
    /// within `keep_bytes`. The rewrite goes through a temp file and rename.
    pub fn cap(&self) -> std::io::Result<bool> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if size <= self.max_bytes {
            return Ok(false);
        }

        let window = self.read_window(size)?;
        let tmp = self.path.with_extension("log.tmp");
        {
            let mut out = File::create(&tmp)?;
            out.write_all(TRUNCATION_MARKER.as_bytes())?;
            out.write_all(b"\n")?;
            out.write_all(&window)?;
            out.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(true)
    }

    /// Last `keep_bytes` of the file, starting on a line boundary.
    fn read_window(&self, size: u64) -> std::io::Result<Vec<u8>> {
        let start = size.saturating_sub(self.keep_bytes);
        // One extra byte tells us whether `start` already sits on a boundary
        let read_from = start.saturating_sub(1);
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(read_from))?;
        let mut buf = Vec::with_capacity((size - read_from) as usize);
        file.take(size - read_from).read_to_end(&mut buf)?;

        if start == 0 {
            return Ok(buf);
        }
        let window = match buf.iter().position(|b| *b == b'\n') {
            Some(nl) => buf.split_off(nl + 1),
            None => Vec::new(),
        };
        Ok(window)
    }

    /// Up to `n` most recent entries, oldest first, marker excluded.
    pub fn read_recent(&self, n: usize) -> Vec<String> {
        let Ok(text) = log_store::read_tail(&self.path, n + 1) else {
            return Vec::new();
        };
        let mut entries: Vec<String> = text
            .lines()
            .filter(|line| !line.is_empty() && *line != TRUNCATION_MARKER)
            .map(str::to_string)
            .collect();
        let start = entries.len().saturating_sub(n);
        entries.split_off(start)
    }

    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Change entries, newest appended last.
pub struct TitleLog {
    ring: Mutex<VecDeque<String>>,
    capacity: usize,
    file: TitleLogFile,
}

impl TitleLog {
    /// Open the log, seeding the ring from the end of the disk file.
    pub fn open(file: TitleLogFile, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let ring: VecDeque<String> = file.read_recent(capacity).into();
        Self { ring: Mutex::new(ring), capacity, file }
    }

    /// Push to the ring (evicting the oldest entry when full), then append
    /// to disk. The ring is updated even when the disk write fails.
    pub fn record(&self, entry: String) -> std::io::Result<()> {
        {
            let mut ring = self.ring.lock();
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(entry.clone());
        }
        self.file.append(&entry)
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.ring.lock().iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.lock().is_empty()
    }

    /// Empty memory and disk.
    pub fn clear(&self) -> std::io::Result<()> {
        self.ring.lock().clear();
        self.file.clear()
    }

    pub fn file(&self) -> &TitleLogFile {
        &self.file
    }
}

#[cfg(test)]
#[path = "title_log_tests.rs"]
mod tests;
