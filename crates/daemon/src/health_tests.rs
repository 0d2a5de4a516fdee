// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    empty_total = { 0, 0, 0.0 },
    nothing_used = { 0, 400, 0.0 },
    half = { 200, 400, 50.0 },
    rounds_to_one_decimal = { 1, 3, 33.3 },
    full = { 400, 400, 100.0 },
    used_beyond_total_caps = { 500, 400, 100.0 },
)]
fn percent_of_total(used: u64, total: u64, expected: f32) {
    assert_eq!(percent(used, total), expected);
}

#[tokio::test]
async fn snapshot_reports_bounded_percentages() {
    let health = snapshot(1_700_000_000_000).await;

    assert_eq!(health.time_ms, 1_700_000_000_000);
    for value in [health.cpu_percent, health.ram_percent, health.disk_percent] {
        assert!((0.0..=100.0).contains(&value), "out of range: {}", value);
    }
    assert!(health.ram_percent > 0.0);
}
