// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cast: control surface for the castd broadcast supervisor

mod client;
mod color;
mod commands;
mod exit_error;
mod output;

use cast_core::TargetId;
use clap::{Parser, Subcommand};

use crate::commands::{daemon, keys, monitor, targets};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "cast", version, about = "Control the cast broadcast supervisor", styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start broadcast targets (yta, ytb, radio)
    Start {
        #[arg(required = true)]
        targets: Vec<TargetId>,
        /// Stream key to use for the YouTube targets instead of the stored keys
        #[arg(long)]
        key: Option<String>,
    },
    /// Stop broadcast targets
    Stop {
        #[arg(required = true)]
        targets: Vec<TargetId>,
    },
    /// Show every target's state
    Status,
    /// Show the tail of a target's log
    Logs {
        target: TargetId,
        /// Number of recent lines to show
        #[arg(short = 'n', long, default_value = "200")]
        lines: usize,
    },
    /// Empty a target's log
    ClearLog { target: TargetId },
    /// Fetch the remote station status now
    Remote,
    /// Show recent title changes, newest first
    Titles {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// Empty the title-change log instead
        #[arg(long, conflicts_with_all = ["limit", "stats"])]
        clear: bool,
        /// Include monitor counters
        #[arg(long)]
        stats: bool,
    },
    /// Push a new title to the audio engine
    PushTitle { title: String },
    /// Show host CPU, memory, disk and network usage
    Health,
    /// Show or replace the stored stream keys
    Keys {
        #[command(subcommand)]
        command: keys::KeysCommand,
    },
    /// Check that the daemon answers
    Ping,
    /// Stop the daemon (broadcasts keep running)
    Shutdown,
    /// Daemon management
    Daemon {
        #[command(subcommand)]
        command: daemon::DaemonCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output;
    match cli.command {
        Command::Start { targets, key } => targets::start(targets, key, format).await,
        Command::Stop { targets } => targets::stop(targets, format).await,
        Command::Status => targets::status(format).await,
        Command::Logs { target, lines } => targets::logs(target, lines, format).await,
        Command::ClearLog { target } => targets::clear_log(target, format).await,
        Command::Remote => monitor::remote(format).await,
        Command::Titles { clear: true, .. } => monitor::clear_titles(format).await,
        Command::Titles { limit, stats, .. } => monitor::titles(limit, stats, format).await,
        Command::PushTitle { title } => monitor::push_title(title, format).await,
        Command::Health => monitor::health(format).await,
        Command::Keys { command } => keys::keys(command, format).await,
        Command::Ping => daemon::ping(format).await,
        Command::Shutdown => daemon::shutdown(format).await,
        Command::Daemon { command } => daemon::daemon(command, format).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
