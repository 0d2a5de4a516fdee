// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    zero = { 0, "0s" },
    seconds = { 59, "59s" },
    minute = { 60, "1m" },
    minutes = { 3599, "59m" },
    hour = { 3600, "1h" },
    day = { 86_400, "1d" },
    days = { 3 * 86_400 + 10, "3d" },
)]
fn elapsed(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}

#[test]
fn local_timestamp_shape() {
    let ts = format_local_timestamp(1_767_225_600_000);
    assert_eq!(ts.len(), "2026-01-01 00:00:00".len());
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], " ");
    assert_eq!(&ts[13..14], ":");
}
