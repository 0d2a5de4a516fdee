// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cast keys` - stored stream keys

use anyhow::Result;
use cast_wire::{Request, Response};
use clap::Subcommand;

use crate::client::{unexpected, DaemonClient};
use crate::output::{format_or_json, OutputFormat};

#[derive(Subcommand)]
pub enum KeysCommand {
    /// Show the stored keys, masked
    Show,
    /// Replace both stored keys; an omitted key is cleared
    Set {
        /// Stream key for YouTube A
        #[arg(long, default_value = "")]
        key1: String,
        /// Stream key for YouTube B
        #[arg(long, default_value = "")]
        key2: String,
    },
}

pub async fn keys(command: KeysCommand, format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start().await?;
    match command {
        KeysCommand::Show => {
            let keys = match client.send(&Request::ShowKeys).await? {
                Response::Keys { keys } => keys,
                other => return Err(unexpected(other).into()),
            };
            format_or_json(format, &keys, || {
                println!("KEY1 (YouTube A): {}", display_key(&keys.key1));
                println!("KEY2 (YouTube B): {}", display_key(&keys.key2));
            })
        }
        KeysCommand::Set { key1, key2 } => {
            match client.send(&Request::SaveKeys { key1, key2 }).await? {
                Response::Ok => {}
                other => return Err(unexpected(other).into()),
            }
            let obj = serde_json::json!({ "saved": true });
            format_or_json(format, &obj, || println!("Keys saved"))
        }
    }
}

fn display_key(masked: &str) -> &str {
    if masked.is_empty() {
        "(not set)"
    } else {
        masked
    }
}
