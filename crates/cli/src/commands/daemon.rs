// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cast ping|shutdown|daemon` - daemon management commands

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Result};
use cast_daemon::Config;
use cast_wire::{Request, Response};
use clap::Subcommand;

use crate::client::{find_castd_binary, unexpected, DaemonClient};
use crate::output::{format_or_json, OutputFormat};

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (foreground or background)
    Start {
        /// Run in foreground (useful for debugging)
        #[arg(long)]
        foreground: bool,
    },
    /// Check daemon status
    Status,
    /// View daemon logs
    Logs {
        /// Number of recent lines to show
        #[arg(short = 'n', long, default_value = "200")]
        limit: usize,
    },
}

pub async fn daemon(command: DaemonCommand, format: OutputFormat) -> Result<()> {
    match command {
        DaemonCommand::Start { foreground } => start(foreground).await,
        DaemonCommand::Status => status(format).await,
        DaemonCommand::Logs { limit } => logs(limit, format),
    }
}

pub async fn ping(format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(_) => return print_not_running(format),
    };
    match client.ping().await {
        Ok(()) => {}
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(e.into()),
    }

    let obj = serde_json::json!({ "status": "running" });
    format_or_json(format, &obj, || println!("pong"))
}

pub async fn shutdown(format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(_) => return print_not_running(format),
    };
    match client.send(&Request::Shutdown).await {
        Ok(Response::ShuttingDown) => {}
        Ok(other) => return Err(unexpected(other).into()),
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(anyhow!("Failed to stop daemon: {}", e)),
    }

    let obj = serde_json::json!({ "status": "stopping" });
    format_or_json(format, &obj, || println!("Daemon stopping"))
}

async fn start(foreground: bool) -> Result<()> {
    if foreground {
        let status = Command::new(find_castd_binary()).arg("--foreground").status()?;
        if !status.success() {
            return Err(anyhow!("Daemon exited with status: {}", status));
        }
        return Ok(());
    }

    if let Ok(client) = DaemonClient::connect() {
        if client.ping().await.is_ok() {
            println!("Daemon already running");
            return Ok(());
        }
    }

    DaemonClient::connect_or_start().await?;
    println!("Daemon started");
    Ok(())
}

async fn status(format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(_) => return print_not_running(format),
    };
    let version = match client.hello().await {
        Ok(v) => v,
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(e.into()),
    };

    let obj = serde_json::json!({ "status": "running", "version": version });
    format_or_json(format, &obj, || {
        println!("Status: running");
        println!("Version: {}", version);
        if version != cast_wire::PROTOCOL_VERSION {
            println!("CLI version: {} (restart the daemon to match)", cast_wire::PROTOCOL_VERSION);
        }
    })
}

fn logs(limit: usize, format: OutputFormat) -> Result<()> {
    let log_path = Config::load()?.log_path;

    if !log_path.exists() {
        let obj = serde_json::json!({
            "log_path": log_path.to_string_lossy(),
            "lines": Vec::<String>::new(),
        });
        return format_or_json(format, &obj, || {
            println!("No log file found at {}", log_path.display())
        });
    }

    let content = read_last_lines(&log_path, limit)?;
    let obj = serde_json::json!({
        "log_path": log_path.to_string_lossy(),
        "lines": content.lines().collect::<Vec<_>>(),
    });
    format_or_json(format, &obj, || println!("{}", content))
}

fn print_not_running(format: OutputFormat) -> Result<()> {
    let obj = serde_json::json!({ "status": "not_running" });
    format_or_json(format, &obj, || println!("Daemon not running"))
}

fn read_last_lines(path: &Path, n: usize) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let lines: Vec<String> = BufReader::new(file).lines().collect::<std::io::Result<_>>()?;
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].join("\n"))
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
