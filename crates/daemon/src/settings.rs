// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon settings file (`cast.toml`).
//!
//! Every field is optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cast_core::{CommandConfig, TargetId};
use serde::Deserialize;
use thiserror::Error;

/// Hard limit on audio engine control endpoints.
pub const MAX_PUSH_ENDPOINTS: usize = 2;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid sweep pattern for {target}: {source}")]
    Pattern {
        target: TargetId,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub commands: CommandSettings,
    pub sweep: SweepSettings,
    pub monitor: MonitorSettings,
    pub title_push: TitlePushSettings,
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(SettingsError::Read { path: path.to_path_buf(), source }),
        };
        let settings: Settings = toml::from_str(&text)
            .map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.title_push.endpoints.len() > MAX_PUSH_ENDPOINTS {
            return Err(SettingsError::Invalid(format!(
                "title_push.endpoints: at most {} endpoints are supported, got {}",
                MAX_PUSH_ENDPOINTS,
                self.title_push.endpoints.len()
            )));
        }
        if self.monitor.interval_secs == 0 {
            return Err(SettingsError::Invalid("monitor.interval_secs must be positive".into()));
        }
        if self.monitor.ring_capacity == 0 {
            return Err(SettingsError::Invalid("monitor.ring_capacity must be positive".into()));
        }
        for target in TargetId::ALL {
            for pattern in self.sweep.patterns(target) {
                regex::Regex::new(pattern)
                    .map_err(|source| SettingsError::Pattern { target, source })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandSettings {
    pub input_url: String,
    /// Liquidsoap script; relative paths resolve against the state dir
    pub radio_script: PathBuf,
    /// Working directory for spawned processes (state dir when unset)
    pub workdir: Option<PathBuf>,
    pub youtube_ingest: String,
    pub youtube_app: String,
}

impl Default for CommandSettings {
    fn default() -> Self {
        let base = CommandConfig::default();
        Self {
            input_url: base.input_url,
            radio_script: base.radio_script,
            workdir: None,
            youtube_ingest: base.youtube_ingest,
            youtube_app: base.youtube_app,
        }
    }
}

impl CommandSettings {
    pub fn command_config(&self, state_dir: &Path) -> CommandConfig {
        CommandConfig {
            input_url: self.input_url.clone(),
            radio_script: state_dir.join(&self.radio_script),
            youtube_ingest: self.youtube_ingest.clone(),
            youtube_app: self.youtube_app.clone(),
        }
    }

    pub fn workdir(&self, state_dir: &Path) -> PathBuf {
        match &self.workdir {
            Some(dir) => state_dir.join(dir),
            None => state_dir.to_path_buf(),
        }
    }
}

/// Command-line regexes the stop sweep matches, per target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepSettings {
    pub yta: Vec<String>,
    pub ytb: Vec<String>,
    pub radio: Vec<String>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            yta: vec![r"ffmpeg .*a\.rtmp\.youtube\.com".to_string()],
            ytb: vec![r"ffmpeg .*b\.rtmp\.youtube\.com".to_string()],
            radio: vec![r"liquidsoap .*stream_obs\.liq".to_string()],
        }
    }
}

impl SweepSettings {
    pub fn patterns(&self, target: TargetId) -> &[String] {
        match target {
            TargetId::Yta => &self.yta,
            TargetId::Ytb => &self.ytb,
            TargetId::Radio => &self.radio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorSettings {
    pub status_url: String,
    pub interval_secs: u64,
    pub fetch_timeout_secs: u64,
    /// Text whose presence in the status page means "online"
    pub online_phrase: String,
    /// Label cell preceding the title cell
    pub title_label: String,
    pub ring_capacity: usize,
    pub log_max_bytes: u64,
    pub log_keep_bytes: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            status_url: "http://127.0.0.1:8000/status.xsl".to_string(),
            interval_secs: 15,
            fetch_timeout_secs: 5,
            online_phrase: "Mount Point".to_string(),
            title_label: "Currently playing:".to_string(),
            ring_capacity: 200,
            log_max_bytes: 256 * 1024,
            log_keep_bytes: 64 * 1024,
        }
    }
}

impl MonitorSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Tail window kept when the disk log is capped; always below the cap.
    pub fn keep_bytes(&self) -> u64 {
        self.log_keep_bytes.min(self.log_max_bytes.saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitlePushSettings {
    /// `host:port` control endpoints
    pub endpoints: Vec<String>,
    /// Command line sent to each endpoint; `{title}` is substituted
    pub command: String,
    pub timeout_secs: u64,
}

impl Default for TitlePushSettings {
    fn default() -> Self {
        Self {
            endpoints: vec!["127.0.0.1:1234".to_string()],
            command: r#"insert_metadata_0.insert title="{title}""#.to_string(),
            timeout_secs: 3,
        }
    }
}

impl TitlePushSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
