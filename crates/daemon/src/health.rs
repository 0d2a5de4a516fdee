// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host readout: CPU, memory, root disk and network totals.

use std::path::Path;

use cast_core::HostHealth;
use sysinfo::{Disks, Networks, System, MINIMUM_CPU_UPDATE_INTERVAL};

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;

/// Take a readout stamped with `time_ms`.
///
/// CPU usage needs two samples, so this waits one sysinfo update interval.
pub async fn snapshot(time_ms: u64) -> HostHealth {
    let mut system = System::new();
    system.refresh_cpu_usage();
    tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    system.refresh_cpu_usage();
    system.refresh_memory();

    let disks = Disks::new_with_refreshed_list();
    let disk_percent = disks
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .map(|disk| {
            let total = disk.total_space();
            percent(total.saturating_sub(disk.available_space()), total)
        })
        .unwrap_or(0.0);

    let networks = Networks::new_with_refreshed_list();
    let (net_bytes_sent, net_bytes_recv) =
        networks.iter().fold((0u64, 0u64), |(sent, recv), (_, data)| {
            (
                sent.saturating_add(data.total_transmitted()),
                recv.saturating_add(data.total_received()),
            )
        });

    HostHealth {
        time_ms,
        cpu_percent: system.global_cpu_usage().clamp(0.0, 100.0),
        ram_percent: percent(system.used_memory(), system.total_memory()),
        disk_percent,
        net_bytes_sent,
        net_bytes_recv,
    }
}

/// `used` as a percentage of `total`, one decimal place. 0 when `total` is 0.
pub fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let ratio = used.min(total) as f64 / total as f64;
    ((ratio * 1000.0).round() / 10.0) as f32
}
