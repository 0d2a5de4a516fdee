// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! One request per connection: read with the IPC timeout, dispatch to the
//! controller, write one response.

use std::sync::Arc;

use cast_wire::{ProtocolError, Request, Response, PROTOCOL_VERSION};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::env::ipc_timeout;
use crate::lifecycle::DaemonController;

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub controller: Arc<DaemonController>,
    /// Notified when a client requests shutdown
    pub shutdown: Arc<Notify>,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Run the listener loop, spawning a task per connection.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("Unix accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => warn!("Connection timeout"),
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection.
async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let request = cast_wire::read_request(&mut reader, ipc_timeout()).await?;

    // Status polling is frequent; everything else is an operator action
    if matches!(
        request,
        Request::Ping | Request::Status | Request::TitleChanges { .. } | Request::Health
    ) {
        debug!(request = ?redacted(&request), "received request");
    } else {
        info!(request = ?redacted(&request), "received request");
    }

    let shutdown = matches!(request, Request::Shutdown);
    let response = handle_request(request, ctx).await;
    debug!("Sending response: {:?}", response);

    let written = cast_wire::write_response(&mut writer, &response, ipc_timeout()).await;
    // Signal only after the reply is out, so the client sees ShuttingDown
    if shutdown {
        ctx.shutdown.notify_one();
    }
    written?;
    Ok(())
}

/// Request with secrets blanked for logging.
fn redacted(request: &Request) -> Request {
    match request {
        Request::Start { targets, key } => Request::Start {
            targets: targets.clone(),
            key: key.as_ref().map(|_| "***".to_string()),
        },
        Request::SaveKeys { .. } => {
            Request::SaveKeys { key1: "***".to_string(), key2: "***".to_string() }
        }
        other => other.clone(),
    }
}

/// Handle a single request and return a response.
pub async fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    let controller = &ctx.controller;
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version } => {
            if version != PROTOCOL_VERSION {
                warn!(client = %version, daemon = PROTOCOL_VERSION, "protocol version mismatch");
            }
            Response::Hello { version: PROTOCOL_VERSION.to_string() }
        }

        Request::Start { targets, key } => {
            if targets.is_empty() {
                return no_targets();
            }
            match controller.start(&targets, key.as_deref()).await {
                Ok(results) => Response::Started { results },
                Err(e) => error_response(e),
            }
        }

        Request::Stop { targets } => {
            if targets.is_empty() {
                return no_targets();
            }
            Response::Stopped { targets: controller.stop(&targets).await }
        }

        Request::Status => Response::Status { targets: controller.status() },

        Request::TailLog { target, lines } => {
            Response::Log { target, content: controller.tail_log(target, lines) }
        }

        Request::ClearLog { target } => {
            controller.clear_log(target);
            Response::Ok
        }

        Request::RemoteStatus => {
            Response::RemoteStatus { status: controller.fetch_remote_status().await }
        }

        Request::TitleChanges { limit, stats } => {
            let snapshot = controller.monitor_snapshot();
            Response::TitleChanges {
                entries: controller.recent_title_changes(limit),
                current: snapshot.as_ref().and_then(|s| s.status.clone()),
                stats: snapshot.filter(|_| stats).map(|s| s.stats),
            }
        }

        Request::ClearTitleLog => match controller.clear_title_log() {
            Ok(()) => Response::Ok,
            Err(e) => error_response(e),
        },

        Request::PushTitle { title } => match controller.push_title(&title).await {
            Ok(results) => Response::TitlePushed { results },
            Err(e) => error_response(e),
        },

        Request::SaveKeys { key1, key2 } => match controller.save_keys(&key1, &key2) {
            Ok(()) => Response::Ok,
            Err(e) => error_response(e),
        },

        Request::Health => Response::Health { health: controller.host_health().await },

        Request::ShowKeys => match controller.show_keys() {
            Ok(keys) => Response::Keys { keys },
            Err(e) => error_response(e),
        },

        // The connection handler notifies once the reply is written
        Request::Shutdown => Response::ShuttingDown,
    }
}

fn no_targets() -> Response {
    Response::Error { message: "no targets given".to_string() }
}

fn error_response(e: impl std::fmt::Display) -> Response {
    Response::Error { message: e.to_string() }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
