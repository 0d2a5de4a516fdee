// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cast remote|titles|push-title|health` - station status, titles and host readout

use anyhow::Result;
use cast_core::format_local_timestamp;
use cast_wire::{Request, Response};

use crate::client::{unexpected, DaemonClient};
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_bytes, format_or_json, push_line, OutputFormat};

pub async fn remote(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let status = match client.send(&Request::RemoteStatus).await? {
        Response::RemoteStatus { status } => status,
        other => return Err(unexpected(other).into()),
    };

    format_or_json(format, &status, || {
        if status.online {
            println!("ONLINE: {}", status.title);
        } else {
            println!("OFFLINE");
        }
    })
}

pub async fn titles(limit: usize, stats: bool, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let (entries, current, stats) =
        match client.send(&Request::TitleChanges { limit, stats }).await? {
            Response::TitleChanges { entries, current, stats } => (entries, current, stats),
            other => return Err(unexpected(other).into()),
        };

    let obj = serde_json::json!({
        "entries": &entries,
        "current": &current,
        "stats": &stats,
    });
    format_or_json(format, &obj, || {
        if let Some(current) = &current {
            let state = if current.online { "online" } else { "offline" };
            println!("{} {}", color::header("Now:"), state);
        }
        if entries.is_empty() {
            println!("No title changes recorded");
        }
        for entry in &entries {
            println!("{}", entry);
        }
        if let Some(stats) = &stats {
            println!();
            println!(
                "{}",
                color::muted(&format!(
                    "cycles {}  fetch failures {}  entries {}  last cycle {}",
                    stats.cycles,
                    stats.fetch_failures,
                    stats.entries,
                    if stats.last_cycle_ms == 0 {
                        "-".to_string()
                    } else {
                        format_local_timestamp(stats.last_cycle_ms)
                    }
                ))
            );
        }
    })
}

pub async fn clear_titles(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    match client.send(&Request::ClearTitleLog).await? {
        Response::Ok => {}
        other => return Err(unexpected(other).into()),
    }

    let obj = serde_json::json!({ "cleared": true });
    format_or_json(format, &obj, || println!("Title log cleared"))
}

pub async fn push_title(title: String, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let results = match client.send(&Request::PushTitle { title }).await? {
        Response::TitlePushed { results } => results,
        other => return Err(unexpected(other).into()),
    };

    format_or_json(format, &results, || {
        for result in &results {
            println!("{}", push_line(result));
        }
    })?;
    if results.iter().any(|r| !r.ok) {
        return Err(ExitError::silent(1).into());
    }
    Ok(())
}

pub async fn health(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let health = match client.send(&Request::Health).await? {
        Response::Health { health } => health,
        other => return Err(unexpected(other).into()),
    };

    format_or_json(format, &health, || {
        println!("{}", color::header(&format_local_timestamp(health.time_ms)));
        println!("cpu   {:>5.1}%", health.cpu_percent);
        println!("ram   {:>5.1}%", health.ram_percent);
        println!("disk  {:>5.1}%", health.disk_percent);
        println!(
            "net   sent {}  received {}",
            format_bytes(health.net_bytes_sent),
            format_bytes(health.net_bytes_recv)
        );
    })
}
