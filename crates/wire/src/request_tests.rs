// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn start_without_key_omits_field() {
    let json = serde_json::to_value(Request::Start { targets: vec![TargetId::Yta], key: None })
        .unwrap();
    assert_eq!(json, serde_json::json!({ "type": "Start", "targets": ["yta"] }));
}

#[test]
fn title_changes_defaults_stats_to_false() {
    let request: Request =
        serde_json::from_str(r#"{"type":"TitleChanges","limit":5}"#).unwrap();
    assert_eq!(request, Request::TitleChanges { limit: 5, stats: false });
}

#[parameterized(
    ping = { r#"{"type":"Ping"}"#, Request::Ping },
    status = { r#"{"type":"Status"}"#, Request::Status },
    health = { r#"{"type":"Health"}"#, Request::Health },
    clear_log = { r#"{"type":"ClearLog","target":"radio"}"#, Request::ClearLog { target: TargetId::Radio } },
    tail = { r#"{"type":"TailLog","target":"ytb","lines":50}"#, Request::TailLog { target: TargetId::Ytb, lines: 50 } },
    stop = { r#"{"type":"Stop","targets":["yta","ytb"]}"#, Request::Stop { targets: vec![TargetId::Yta, TargetId::Ytb] } },
)]
fn decodes_tagged_form(json: &str, expected: Request) {
    let request: Request = serde_json::from_str(json).unwrap();
    assert_eq!(request, expected);
}

#[test]
fn unknown_target_is_rejected() {
    let result = serde_json::from_str::<Request>(r#"{"type":"ClearLog","target":"tv"}"#);
    assert!(result.is_err());
}
