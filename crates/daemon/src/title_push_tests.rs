// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::*;

const TEMPLATE: &str = r#"insert_metadata_0.insert title="{title}""#;

/// Control port stand-in: answers each command with `Done` + `END`, closes
/// on `quit`, and returns the lines it received.
async fn control_port() -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();
        let mut received = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            if line == "quit" {
                write.write_all(b"Bye!\n").await.unwrap();
                break;
            }
            received.push(line);
            write.write_all(b"Done\nEND\n").await.unwrap();
        }
        received
    });
    (addr, task)
}

/// An address nothing listens on.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

#[yare::parameterized(
    plain = { "Morning Show", r#"insert_metadata_0.insert title="Morning Show""# },
    quotes = { r#"The "Best" Hits"#, r#"insert_metadata_0.insert title="The \"Best\" Hits""# },
    newlines = { "Line one\r\nLine two", r#"insert_metadata_0.insert title="Line oneLine two""# },
    padded = { "  Jazz  ", r#"insert_metadata_0.insert title="Jazz""# },
)]
fn render_sanitises_title(title: &str, expected: &str) {
    let pusher = TitlePusher::new(vec![], TEMPLATE, Duration::from_secs(1));
    assert_eq!(pusher.render(title), expected);
}

#[tokio::test]
async fn push_sends_command_then_quit() {
    let (addr, server) = control_port().await;
    let pusher = TitlePusher::new(vec![addr.clone()], TEMPLATE, Duration::from_secs(3));

    let results = pusher.push("Evening News").await.unwrap();

    assert_eq!(results, vec![PushResult { endpoint: addr, ok: true, detail: "OK".into() }]);
    assert_eq!(
        server.await.unwrap(),
        vec![r#"insert_metadata_0.insert title="Evening News""#.to_string()]
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_reported_separately() {
    let (good, server) = control_port().await;
    let bad = closed_port().await;
    let pusher =
        TitlePusher::new(vec![good.clone(), bad.clone()], TEMPLATE, Duration::from_secs(3));

    let results = pusher.push("Live Set").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], PushResult { endpoint: good, ok: true, detail: "OK".into() });
    assert_eq!(results[1].endpoint, bad);
    assert!(!results[1].ok);
    assert_ne!(results[1].detail, "OK");
    assert!(!results[1].detail.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn silent_endpoint_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    // Accepts but never answers or closes
    let hold = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });
    let pusher = TitlePusher::new(vec![addr], TEMPLATE, Duration::from_millis(200));

    let results = pusher.push("Anything").await.unwrap();

    assert!(!results[0].ok);
    assert!(results[0].detail.contains("timed out"), "{}", results[0].detail);
    hold.abort();
}

#[tokio::test]
async fn empty_title_is_rejected_before_connecting() {
    let pusher = TitlePusher::new(vec![closed_port().await], TEMPLATE, Duration::from_secs(1));
    assert!(matches!(pusher.push("   ").await, Err(PushError::EmptyTitle)));
    assert!(matches!(pusher.push("").await, Err(PushError::EmptyTitle)));
}

#[tokio::test]
async fn no_endpoints_yields_no_results() {
    let pusher = TitlePusher::new(vec![], TEMPLATE, Duration::from_secs(1));
    assert!(pusher.push("Title").await.unwrap().is_empty());
}
