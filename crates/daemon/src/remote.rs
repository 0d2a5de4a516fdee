// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote station status page: fetching and parsing.

use std::time::Duration;

use async_trait::async_trait;
use cast_core::RemoteStatus;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
}

/// Where the monitor gets its observations from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<RemoteStatus, FetchError>;
}

/// Extracts online state and title from a status page.
///
/// Online means the page contains `online_phrase`. The title is the cell
/// following the cell labelled `title_label`, with markup stripped and
/// entities decoded.
#[derive(Debug, Clone)]
pub struct StatusParser {
    online_phrase: String,
    title_cell: Regex,
    tag: Regex,
}

impl StatusParser {
    pub fn new(online_phrase: &str, title_label: &str) -> Result<Self, regex::Error> {
        let title_cell = Regex::new(&format!(
            r"(?is){}\s*</td>\s*<td[^>]*>(.*?)</td>",
            regex::escape(title_label)
        ))?;
        Ok(Self {
            online_phrase: online_phrase.to_string(),
            title_cell,
            tag: Regex::new(r"(?s)<[^>]*>")?,
        })
    }

    pub fn parse(&self, body: &str) -> RemoteStatus {
        let online = !self.online_phrase.is_empty() && body.contains(&self.online_phrase);
        let title = self
            .title_cell
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| self.clean(m.as_str()))
            .unwrap_or_default();
        RemoteStatus { online, title }
    }

    fn clean(&self, cell: &str) -> String {
        let text = self.tag.replace_all(cell, "");
        let text = decode_entities(&text);
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Decode named and numeric HTML character references. Unknown references
/// are left as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&after[..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// `StatusSource` that GETs a status page over HTTP.
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
    parser: StatusParser,
}

impl HttpStatusSource {
    pub fn new(url: &str, timeout: Duration, parser: StatusParser) -> Result<Self, FetchError> {
        // The status page is a direct endpoint; environment proxies are not consulted.
        let client = reqwest::Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self { client, url: url.to_string(), parser })
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<RemoteStatus, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        Ok(self.parser.parse(&body))
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
