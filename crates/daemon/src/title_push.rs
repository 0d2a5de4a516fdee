// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push a new title to the audio engine's line-oriented control ports.

use std::time::Duration;

use cast_wire::PushResult;
use futures_util::future::join_all;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::settings::TitlePushSettings;

/// Placeholder replaced by the title in the command template.
pub const TITLE_PLACEHOLDER: &str = "{title}";

#[derive(Debug, Error)]
pub enum PushError {
    #[error("title is empty")]
    EmptyTitle,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Sends one rendered command to every configured endpoint.
#[derive(Debug, Clone)]
pub struct TitlePusher {
    endpoints: Vec<String>,
    template: String,
    timeout: Duration,
}

impl TitlePusher {
    pub fn new(endpoints: Vec<String>, template: impl Into<String>, timeout: Duration) -> Self {
        Self { endpoints, template: template.into(), timeout }
    }

    pub fn from_settings(settings: &TitlePushSettings) -> Self {
        Self::new(settings.endpoints.clone(), settings.command.clone(), settings.timeout())
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// The command line for `title`: quotes escaped, line breaks dropped.
    pub fn render(&self, title: &str) -> String {
        let clean: String = title
            .trim()
            .chars()
            .filter(|c| *c != '\r' && *c != '\n')
            .collect::<String>()
            .replace('\\', "\\\\")
            .replace('"', "\\\"");
        self.template.replace(TITLE_PLACEHOLDER, &clean)
    }

    /// Push `title` to each endpoint concurrently. Every endpoint gets its
    /// own result; one failing never affects the others.
    pub async fn push(&self, title: &str) -> Result<Vec<PushResult>, PushError> {
        if title.trim().is_empty() {
            return Err(PushError::EmptyTitle);
        }
        let line = self.render(title);
        let attempts = self.endpoints.iter().map(|endpoint| {
            let line = line.as_str();
            async move {
                match send_command(endpoint, line, self.timeout).await {
                    Ok(()) => {
                        info!(endpoint = %endpoint, "title pushed");
                        PushResult { endpoint: endpoint.clone(), ok: true, detail: "OK".into() }
                    }
                    Err(e) => {
                        warn!(endpoint = %endpoint, error = %e, "title push failed");
                        PushResult { endpoint: endpoint.clone(), ok: false, detail: e.to_string() }
                    }
                }
            }
        });
        Ok(join_all(attempts).await)
    }
}

/// Connect, send `line` then `quit`, and drain the reply up to `END` or EOF.
async fn send_command(endpoint: &str, line: &str, timeout: Duration) -> Result<(), PushError> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(endpoint))
        .await
        .map_err(|_| PushError::Timeout(timeout))??;

    let payload = format!("{}\nquit\n", line);
    tokio::time::timeout(timeout, stream.write_all(payload.as_bytes()))
        .await
        .map_err(|_| PushError::Timeout(timeout))??;

    tokio::time::timeout(timeout, drain_reply(&mut stream, endpoint))
        .await
        .map_err(|_| PushError::Timeout(timeout))?
}

async fn drain_reply(stream: &mut TcpStream, endpoint: &str) -> Result<(), PushError> {
    let mut reader = BufReader::new(stream);
    let mut reply = String::new();
    loop {
        reply.clear();
        if reader.read_line(&mut reply).await? == 0 {
            return Ok(());
        }
        let reply = reply.trim_end();
        debug!(endpoint = %endpoint, reply, "control port reply");
        if reply == "END" {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "title_push_tests.rs"]
mod tests;
