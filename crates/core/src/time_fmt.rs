// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time formatting helpers shared by the daemon and the CLI.

use chrono::{DateTime, Local};

/// Format elapsed seconds as a compact age ("42s", "5m", "3h", "2d").
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86_399 => format!("{}h", secs / 3600),
        _ => format!("{}d", secs / 86_400),
    }
}

/// Format epoch milliseconds as local `YYYY-MM-DD HH:MM:SS`.
pub fn format_local_timestamp(epoch_ms: u64) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(epoch_ms as i64) else {
        return "????-??-?? ??:??:??".to_string();
    };
    utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
