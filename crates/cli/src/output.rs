// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use cast_core::format_elapsed;
use cast_wire::{PushResult, StartEntry, StartResult, TargetEntry};
use clap::ValueEnum;
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format-branch helper for single-object commands.
///
/// Renders as JSON when `format` is `Json`, otherwise calls `text_fn`.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

/// Render a list as text or JSON. Handles empty check + format branch.
pub fn handle_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_msg);
            } else {
                render_text(items, &mut std::io::stdout());
            }
        }
    }
    Ok(())
}

/// Age of a log from its mtime age, "-" when there is no log.
pub fn format_log_age(age_ms: Option<u64>) -> String {
    match age_ms {
        Some(ms) => format!("{} ago", format_elapsed(ms / 1000)),
        None => "-".to_string(),
    }
}

/// Byte count in binary units, e.g. "1.5 GiB".
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

pub fn render_status(targets: &[TargetEntry], out: &mut dyn Write) {
    let header = format!("{:<7} {:<11} {:<8} {:<8} {}", "TARGET", "NAME", "STATE", "PID", "LOG");
    let _ = writeln!(out, "{}", color::header(&header));
    for entry in targets {
        let state = if entry.status.running { "running" } else { "stopped" };
        let pid = entry.status.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<7} {:<11} {:<8} {:<8} {}",
            entry.target.as_str(),
            entry.target.label(),
            state,
            pid,
            color::muted(&format_log_age(entry.status.log_age_ms))
        );
    }
}

/// One line per start outcome.
pub fn start_line(entry: &StartEntry) -> String {
    let name = entry.target.label();
    match &entry.result {
        StartResult::Started { pid } => format!("{} started (pid {})", name, pid),
        StartResult::AlreadyRunning { pid } => format!("{} already running (pid {})", name, pid),
        StartResult::MissingKey => format!("{} not started: no stream key configured", name),
        StartResult::Failed { error } => format!("{} failed to start: {}", name, error),
    }
}

/// Whether any start outcome means the target is not on air.
pub fn any_start_failed(results: &[StartEntry]) -> bool {
    results
        .iter()
        .any(|e| matches!(e.result, StartResult::MissingKey | StartResult::Failed { .. }))
}

pub fn push_line(result: &PushResult) -> String {
    let state = if result.ok { "ok" } else { "failed" };
    format!("{}: {} ({})", result.endpoint, state, result.detail)
}
