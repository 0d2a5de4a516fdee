// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use cast_core::{TargetId, TargetStatus};
use serial_test::serial;
use yare::parameterized;

use super::*;

fn entry(target: TargetId, result: StartResult) -> StartEntry {
    StartEntry { target, result }
}

#[parameterized(
    none = { None, "-" },
    seconds = { Some(4_500), "4s ago" },
    minutes = { Some(125_000), "2m ago" },
    hours = { Some(7_200_000), "2h ago" },
)]
fn log_age(age_ms: Option<u64>, expected: &str) {
    assert_eq!(format_log_age(age_ms), expected);
}

#[parameterized(
    bytes = { 512, "512 B" },
    kibibytes = { 1536, "1.5 KiB" },
    gibibytes = { 3 * 1024 * 1024 * 1024, "3.0 GiB" },
    capped_at_tebibytes = { 2048 * 1024 * 1024 * 1024 * 1024, "2048.0 TiB" },
)]
fn byte_counts(bytes: u64, expected: &str) {
    assert_eq!(format_bytes(bytes), expected);
}

#[parameterized(
    started = { StartResult::Started { pid: 42 }, "YouTube A started (pid 42)" },
    running = { StartResult::AlreadyRunning { pid: 7 }, "YouTube A already running (pid 7)" },
    missing = { StartResult::MissingKey, "YouTube A not started: no stream key configured" },
    failed = {
        StartResult::Failed { error: "yta: failed to spawn: not found".into() },
        "YouTube A failed to start: yta: failed to spawn: not found"
    },
)]
fn start_lines(result: StartResult, expected: &str) {
    assert_eq!(start_line(&entry(TargetId::Yta, result)), expected);
}

#[test]
fn missing_key_or_failure_counts_as_failed() {
    let ok = vec![
        entry(TargetId::Yta, StartResult::Started { pid: 1 }),
        entry(TargetId::Radio, StartResult::AlreadyRunning { pid: 2 }),
    ];
    assert!(!any_start_failed(&ok));

    let mut with_missing = ok.clone();
    with_missing.push(entry(TargetId::Ytb, StartResult::MissingKey));
    assert!(any_start_failed(&with_missing));

    let failed = vec![entry(TargetId::Radio, StartResult::Failed { error: "x".into() })];
    assert!(any_start_failed(&failed));
}

#[test]
fn push_lines_show_endpoint_and_detail() {
    let ok = PushResult { endpoint: "127.0.0.1:1234".into(), ok: true, detail: "OK".into() };
    let failed = PushResult {
        endpoint: "127.0.0.1:1235".into(),
        ok: false,
        detail: "connection refused".into(),
    };

    assert_eq!(push_line(&ok), "127.0.0.1:1234: ok (OK)");
    assert_eq!(push_line(&failed), "127.0.0.1:1235: failed (connection refused)");
}

#[test]
#[serial]
fn status_table_lists_each_target() {
    std::env::set_var("NO_COLOR", "1");
    let targets = vec![
        TargetEntry {
            target: TargetId::Yta,
            status: TargetStatus { running: true, pid: Some(4242), log_age_ms: Some(3_000) },
        },
        TargetEntry { target: TargetId::Radio, status: TargetStatus::default() },
    ];

    let mut out = Vec::new();
    render_status(&targets, &mut out);
    std::env::remove_var("NO_COLOR");

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("TARGET"));
    assert!(lines[1].starts_with("yta"));
    assert!(lines[1].contains("running") && lines[1].contains("4242") && lines[1].contains("3s ago"));
    assert!(lines[2].starts_with("radio"));
    assert!(lines[2].contains("stopped"));
}

#[test]
fn json_output_succeeds_for_lists_and_objects() {
    let targets: Vec<TargetEntry> = vec![];
    assert!(handle_list(OutputFormat::Json, &targets, "none", |_, _| {}).is_ok());
    assert!(format_or_json(OutputFormat::Json, &serde_json::json!({"ok": true}), || {}).is_ok());
}
