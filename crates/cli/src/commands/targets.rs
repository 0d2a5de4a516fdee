// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cast start|stop|status|logs|clear-log` - broadcast targets

use anyhow::Result;
use cast_core::TargetId;
use cast_wire::{Request, Response};

use crate::client::{unexpected, DaemonClient};
use crate::exit_error::ExitError;
use crate::output::{
    any_start_failed, format_or_json, handle_list, render_status, start_line, OutputFormat,
};

pub async fn start(targets: Vec<TargetId>, key: Option<String>, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let results = match client.send(&Request::Start { targets, key }).await? {
        Response::Started { results } => results,
        other => return Err(unexpected(other).into()),
    };

    format_or_json(format, &results, || {
        for entry in &results {
            println!("{}", start_line(entry));
        }
    })?;
    if any_start_failed(&results) {
        return Err(ExitError::silent(1).into());
    }
    Ok(())
}

pub async fn stop(targets: Vec<TargetId>, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let stopped = match client.send(&Request::Stop { targets }).await? {
        Response::Stopped { targets } => targets,
        other => return Err(unexpected(other).into()),
    };

    format_or_json(format, &stopped, || {
        for target in &stopped {
            println!("{} stopped", target.label());
        }
    })
}

pub async fn status(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let targets = match client.send(&Request::Status).await? {
        Response::Status { targets } => targets,
        other => return Err(unexpected(other).into()),
    };

    handle_list(format, &targets, "No targets", render_status)
}

pub async fn logs(target: TargetId, lines: usize, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    let content = match client.send(&Request::TailLog { target, lines }).await? {
        Response::Log { content, .. } => content,
        other => return Err(unexpected(other).into()),
    };

    let obj = serde_json::json!({
        "target": target,
        "lines": content.lines().collect::<Vec<_>>(),
    });
    format_or_json(format, &obj, || {
        if content.is_empty() {
            eprintln!("No log entries for {}", target.label());
        } else {
            println!("{}", content);
        }
    })
}

pub async fn clear_log(target: TargetId, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    match client.send(&Request::ClearLog { target }).await? {
        Response::Ok => {}
        other => return Err(unexpected(other).into()),
    }

    let obj = serde_json::json!({ "cleared": target });
    format_or_json(format, &obj, || println!("{} log cleared", target.label()))
}
