// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream key storage: a `KEY=value` file with one line per key.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::target::{KeySlot, TargetId};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stream keys for the YouTube relays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys {
    pub key1: String,
    pub key2: String,
}

impl Keys {
    pub fn get(&self, slot: KeySlot) -> &str {
        match slot {
            KeySlot::Key1 => &self.key1,
            KeySlot::Key2 => &self.key2,
        }
    }

    /// The non-empty key a target needs, if any.
    pub fn for_target(&self, target: TargetId) -> Option<&str> {
        target.key_slot().map(|slot| self.get(slot)).filter(|k| !k.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.key1.is_empty() && self.key2.is_empty()
    }

    /// Copy with every key masked for display.
    pub fn masked(&self) -> Keys {
        Keys { key1: mask(&self.key1), key2: mask(&self.key2) }
    }
}

/// Credentials file handle.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the keys, creating an empty credentials file if none exists.
    ///
    /// Blank lines, `#` comments, lines without `=` and unknown names are
    /// skipped.
    pub fn read(&self) -> Result<Keys, CredentialError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let keys = Keys::default();
                self.write(&keys)?;
                return Ok(keys);
            }
            Err(source) => return Err(CredentialError::Read { path: self.path.clone(), source }),
        };
        Ok(parse_keys(&text))
    }

    pub fn write(&self, keys: &Keys) -> Result<(), CredentialError> {
        let write_err = |source| CredentialError::Write { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let body = format!(
            "{}={}\n{}={}\n",
            KeySlot::Key1.var_name(),
            keys.key1.trim(),
            KeySlot::Key2.var_name(),
            keys.key2.trim()
        );
        std::fs::write(&self.path, body).map_err(write_err)
    }
}

fn parse_keys(text: &str) -> Keys {
    let mut keys = Keys::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        match name.trim() {
            "KEY1" => keys.key1 = value.trim().to_string(),
            "KEY2" => keys.key2 = value.trim().to_string(),
            _ => {}
        }
    }
    keys
}

/// Mask a secret so only its last four characters remain visible.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
