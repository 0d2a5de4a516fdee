// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client: one request per connection over the control socket.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use cast_daemon::env::ipc_timeout;
use cast_daemon::Config;
use cast_wire::{ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

/// Requests that wait on processes or the network get a longer read window.
const SLOW_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How long `connect_or_start` waits for a freshly spawned daemon.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

const STARTUP_MARKER: &str = "--- castd: starting";
const STARTUP_ERROR_PREFIX: &str = "Failed to start daemon: ";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    NotRunning,

    #[error("could not determine state directory: {0}")]
    Config(#[from] cast_daemon::LifecycleError),

    #[error("failed to start daemon: {0}")]
    StartFailed(String),

    #[error("{0}")]
    Rejected(String),

    #[error("unexpected response from daemon: {0:?}")]
    Unexpected(Box<Response>),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_not_running(&self) -> bool {
        match self {
            ClientError::NotRunning => true,
            ClientError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
            ),
            _ => false,
        }
    }
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Client for a daemon whose socket already exists.
    pub fn connect() -> Result<Self, ClientError> {
        let config = Config::load()?;
        Self::at(config.socket_path)
    }

    fn at(socket_path: PathBuf) -> Result<Self, ClientError> {
        if !socket_path.exists() {
            return Err(ClientError::NotRunning);
        }
        Ok(Self { socket_path })
    }

    /// Connect, spawning `castd` in the background if it is not running.
    pub async fn connect_or_start() -> Result<Self, ClientError> {
        let config = Config::load()?;
        if let Ok(client) = Self::at(config.socket_path.clone()) {
            if client.ping().await.is_ok() {
                return Ok(client);
            }
        }
        start_daemon(&config).await?;
        Self::at(config.socket_path)
    }

    /// Send one request and read one response.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let read_timeout = match request {
            Request::Start { .. }
            | Request::Stop { .. }
            | Request::RemoteStatus
            | Request::PushTitle { .. } => SLOW_REQUEST_TIMEOUT.max(ipc_timeout()),
            _ => ipc_timeout(),
        };
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();
        cast_wire::write_request(&mut writer, request, ipc_timeout()).await?;
        let response = cast_wire::read_response(&mut reader, read_timeout).await?;
        match response {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            other => Ok(other),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Daemon version from the handshake.
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello { version: cast_wire::PROTOCOL_VERSION.to_string() };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }
}

pub fn unexpected(response: Response) -> ClientError {
    ClientError::Unexpected(Box::new(response))
}

/// Spawn `castd` detached and wait until it answers a ping.
///
/// If the daemon exits first, the error it logged after its startup marker
/// is reported.
async fn start_daemon(config: &Config) -> Result<(), ClientError> {
    let binary = find_castd_binary();
    let mut child = tokio::process::Command::new(&binary)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .kill_on_drop(false)
        .spawn()
        .map_err(|e| ClientError::StartFailed(format!("{}: {}", binary.display(), e)))?;

    let deadline = Instant::now() + STARTUP_TIMEOUT;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait()? {
            let reason = read_startup_error(&config.log_path)
                .unwrap_or_else(|| format!("castd exited with {}", status));
            return Err(ClientError::StartFailed(reason));
        }
        if let Ok(client) = DaemonClient::at(config.socket_path.clone()) {
            if client.ping().await.is_ok() {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    Err(ClientError::StartFailed(format!(
        "no response within {}s, see {}",
        STARTUP_TIMEOUT.as_secs(),
        config.log_path.display()
    )))
}

fn read_startup_error(log_path: &Path) -> Option<String> {
    let log = std::fs::read_to_string(log_path).ok()?;
    parse_startup_error(&log)
}

/// The startup error logged after the most recent startup marker, if any.
pub fn parse_startup_error(log: &str) -> Option<String> {
    let start = log.rfind(STARTUP_MARKER)?;
    log[start..].lines().find_map(|line| {
        line.find(STARTUP_ERROR_PREFIX)
            .map(|i| line[i + STARTUP_ERROR_PREFIX.len()..].trim().to_string())
    })
}

/// `castd` next to the running `cast`, else whatever is on PATH.
pub fn find_castd_binary() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("castd")))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from("castd"))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
