// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn on(title: &str) -> RemoteStatus {
    RemoteStatus::online(title)
}

fn off() -> RemoteStatus {
    RemoteStatus::offline()
}

#[parameterized(
    baseline_offline = { None, off(), None },
    baseline_online = { None, on("A"), None },
    steady_offline = { Some(off()), off(), None },
    steady_online = { Some(on("A")), on("A"), None },
    goes_online = { Some(off()), on("A"), Some("ONLINE, title='A'") },
    goes_online_untitled = { Some(off()), on(""), Some("ONLINE, title='(unknown)'") },
    goes_offline = { Some(on("A")), off(), Some("OFFLINE") },
    title_changes = { Some(on("A")), on("B"), Some("Title changed: 'A' -> 'B'") },
    title_appears = { Some(on("")), on("B"), Some("Title changed: '(unknown)' -> 'B'") },
    title_vanishes = { Some(on("A")), on(""), Some("Title changed: 'A' -> '(unknown)'") },
)]
fn transitions(previous: Option<RemoteStatus>, current: RemoteStatus, expected: Option<&str>) {
    assert_eq!(change_message(previous.as_ref(), &current).as_deref(), expected);
}

#[test]
fn offline_title_noise_is_ignored() {
    let previous = RemoteStatus { online: false, title: "A".into() };
    let current = RemoteStatus { online: false, title: "B".into() };
    assert_eq!(change_message(Some(&previous), &current), None);
}

#[test]
fn documented_sequence_yields_three_entries() {
    let observations = [off(), off(), on("A"), on("A"), on("B"), off()];
    let mut last: Option<RemoteStatus> = None;
    let mut entries = Vec::new();
    for observed in observations {
        if let Some(message) = change_message(last.as_ref(), &observed) {
            entries.push(message);
        }
        last = Some(observed);
    }
    assert_eq!(entries, ["ONLINE, title='A'", "Title changed: 'A' -> 'B'", "OFFLINE"]);
}
