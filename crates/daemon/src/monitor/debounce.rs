// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turning consecutive observations into change messages.

use cast_core::RemoteStatus;

/// Rendered in place of an empty title.
pub const UNKNOWN_TITLE: &str = "(unknown)";

fn shown(title: &str) -> &str {
    if title.is_empty() {
        UNKNOWN_TITLE
    } else {
        title
    }
}

/// The entry to record for `current`, given the previous observation.
///
/// The first observation is a silent baseline. An online/offline flip wins
/// over a title change observed in the same cycle, so a title that arrives
/// with the transition is reported once, inside the ONLINE message. Title
/// changes are only reported while online.
pub fn change_message(previous: Option<&RemoteStatus>, current: &RemoteStatus) -> Option<String> {
    let previous = previous?;

    if previous.online != current.online {
        return Some(if current.online {
            format!("ONLINE, title='{}'", shown(&current.title))
        } else {
            "OFFLINE".to_string()
        });
    }

    if current.online && previous.title != current.title {
        return Some(format!(
            "Title changed: '{}' -> '{}'",
            shown(&previous.title),
            shown(&current.title)
        ));
    }

    None
}

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;
