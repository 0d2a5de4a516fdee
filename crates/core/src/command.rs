// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command lines for the external broadcast programs.
//!
//! Pure mapping from `(target, key)` to an argument vector. Nothing here
//! touches the filesystem or spawns anything.

use std::path::PathBuf;

use thiserror::Error;

use crate::target::TargetId;

/// Fixed endpoints and paths the commands are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    /// Local ingest the video relays pull from
    pub input_url: String,
    /// Liquidsoap script run by the radio target
    pub radio_script: PathBuf,
    /// Ingest host template; `{endpoint}` is replaced by the target's letter
    pub youtube_ingest: String,
    /// RTMP application path on the ingest host
    pub youtube_app: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            input_url: "rtmp://localhost:1935/live/test".to_string(),
            radio_script: PathBuf::from("stream_obs.liq"),
            youtube_ingest: "{endpoint}.rtmp.youtube.com".to_string(),
            youtube_app: "live2".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{} key is empty", .0.label())]
    MissingKey(TargetId),
}

/// Build the argument vector for a target.
///
/// Each command runs through `bash -lc exec ...` so the login environment is
/// loaded and the program replaces the shell (the spawned pid is the program).
pub fn build_command(
    target: TargetId,
    key: Option<&str>,
    config: &CommandConfig,
) -> Result<Vec<String>, CommandError> {
    let script = match target.endpoint_letter() {
        Some(letter) => {
            let key = key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .ok_or(CommandError::MissingKey(target))?;
            let host = config.youtube_ingest.replace("{endpoint}", letter);
            let url = format!("rtmp://{}/{}/{}", host, config.youtube_app, key);
            format!("exec ffmpeg -re -i \"{}\" -c copy -f flv \"{}\"", config.input_url, url)
        }
        None => format!("exec liquidsoap \"{}\"", config.radio_script.display()),
    };
    Ok(vec!["bash".to_string(), "-lc".to_string(), script])
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
