// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! castd: broadcast supervisor daemon

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use cast_daemon::{startup, Config, ListenCtx, Listener, StartupResult};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: castd [--foreground] [--version]";

#[tokio::main]
async fn main() -> ExitCode {
    let mut foreground = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--foreground" => foreground = true,
            "--version" | "-V" => {
                println!("castd {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("castd: unknown argument: {}\n{}", other, USAGE);
                return ExitCode::from(2);
            }
        }
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("castd: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match init_logging(&config, foreground) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("castd: failed to open {}: {}", config.log_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    info!(state_dir = %config.state_dir.display(), "Starting daemon");
    let StartupResult { mut daemon, listener } = match startup(&config).await {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ListenCtx {
        controller: Arc::clone(&daemon.controller),
        shutdown: Arc::clone(&shutdown),
    });
    let listener_task = tokio::spawn(Listener::new(listener, ctx).run());

    // Clients starting the daemon wait for this line
    println!("READY");
    let _ = std::io::stdout().flush();

    if let Err(e) = wait_for_shutdown(&shutdown).await {
        error!("Failed to install signal handler: {}", e);
    }

    listener_task.abort();
    if let Err(e) = daemon.shutdown().await {
        error!("Shutdown error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Foreground logs go to stderr; background logs append to `daemon.log`
/// behind a startup marker the CLI uses to find startup errors.
fn init_logging(config: &Config, foreground: bool) -> std::io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if foreground {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all(&config.state_dir)?;
    let mut log = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    writeln!(log, "--- castd: starting (pid: {}) ---\n", std::process::id())?;

    let dir = config.log_path.parent().unwrap_or(&config.state_dir);
    let file_name = config.log_path.file_name().unwrap_or_else(|| "daemon.log".as_ref());
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

async fn wait_for_shutdown(requested: &Notify) -> std::io::Result<()> {
    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = requested.notified() => info!("Shutdown requested"),
        _ = term.recv() => info!("Received SIGTERM"),
        _ = tokio::signal::ctrl_c() => info!("Received interrupt"),
    }
    Ok(())
}
