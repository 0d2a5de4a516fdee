// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use cast_core::FakeClock;
use parking_lot::Mutex;
use tempfile::tempdir;

use super::*;

enum Step {
    Up(&'static str),
    Down,
    Fail,
    Hang,
}

/// Replays a fixed script of observations; fails once exhausted.
struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self { steps: Mutex::new(steps.into()) })
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<RemoteStatus, FetchError> {
        let step = self.steps.lock().pop_front();
        match step {
            Some(Step::Up(title)) => Ok(RemoteStatus::online(title)),
            Some(Step::Down) => Ok(RemoteStatus::offline()),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Fail) | None => Err(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        }
    }
}

const CONFIG: MonitorConfig =
    MonitorConfig { interval: Duration::from_secs(15), fetch_timeout: Duration::from_secs(5) };

fn title_log(dir: &Path) -> Arc<TitleLog> {
    Arc::new(TitleLog::open(TitleLogFile::new(dir.join("title_changes.log"), 1 << 20, 1 << 16), 200))
}

fn messages(log: &TitleLog) -> Vec<String> {
    log.recent(usize::MAX)
        .into_iter()
        .rev()
        .map(|entry| entry.split_once("] ").map(|(_, m)| m.to_string()).unwrap_or(entry))
        .collect()
}

#[tokio::test]
async fn documented_sequence_records_three_changes() {
    let dir = tempdir().unwrap();
    let log = title_log(dir.path());
    let source = ScriptedSource::new(vec![
        Step::Down,
        Step::Down,
        Step::Up("A"),
        Step::Up("A"),
        Step::Up("B"),
        Step::Down,
    ]);
    let (mut monitor, rx) = Monitor::new(source, Arc::clone(&log), FakeClock::new(), CONFIG);

    for _ in 0..6 {
        monitor.cycle().await;
    }

    assert_eq!(
        messages(&log),
        vec!["ONLINE, title='A'", "Title changed: 'A' -> 'B'", "OFFLINE"]
    );
    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.status, Some(RemoteStatus::offline()));
    assert_eq!(snapshot.stats.cycles, 6);
    assert_eq!(snapshot.stats.entries, 3);
    assert_eq!(snapshot.stats.fetch_failures, 0);

    let on_disk = std::fs::read_to_string(dir.path().join("title_changes.log")).unwrap();
    assert_eq!(on_disk.lines().count(), 3);
}

#[tokio::test]
async fn entries_carry_clock_timestamp() {
    let dir = tempdir().unwrap();
    let log = title_log(dir.path());
    let clock = FakeClock::new();
    let (mut monitor, _rx) =
        Monitor::new(ScriptedSource::new(vec![Step::Down, Step::Up("X")]), Arc::clone(&log), clock.clone(), CONFIG);

    monitor.cycle().await;
    clock.advance(Duration::from_secs(60));
    monitor.cycle().await;

    let expected = format_entry(FakeClock::START_MS + 60_000, "ONLINE, title='X'");
    assert_eq!(log.recent(1), vec![expected]);
}

#[tokio::test]
async fn repeated_fetch_failures_never_stop_the_monitor() {
    let dir = tempdir().unwrap();
    let log = title_log(dir.path());
    let (mut monitor, rx) =
        Monitor::new(ScriptedSource::new(vec![]), Arc::clone(&log), FakeClock::new(), CONFIG);

    for _ in 0..5 {
        monitor.cycle().await;
    }

    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.status, Some(RemoteStatus::offline()));
    assert_eq!(snapshot.stats.cycles, 5);
    assert_eq!(snapshot.stats.fetch_failures, 5);
    assert!(log.is_empty());
}

#[tokio::test]
async fn failure_after_online_reads_as_offline() {
    let dir = tempdir().unwrap();
    let log = title_log(dir.path());
    let (mut monitor, _rx) = Monitor::new(
        ScriptedSource::new(vec![Step::Up("A"), Step::Fail]),
        Arc::clone(&log),
        FakeClock::new(),
        CONFIG,
    );

    monitor.cycle().await;
    monitor.cycle().await;

    assert_eq!(messages(&log), vec!["OFFLINE"]);
}

#[tokio::test(start_paused = true)]
async fn hung_fetch_times_out_as_offline() {
    let dir = tempdir().unwrap();
    let log = title_log(dir.path());
    let (mut monitor, rx) = Monitor::new(
        ScriptedSource::new(vec![Step::Up("A"), Step::Hang]),
        Arc::clone(&log),
        FakeClock::new(),
        CONFIG,
    );

    monitor.cycle().await;
    let before = tokio::time::Instant::now();
    monitor.cycle().await;

    assert!(before.elapsed() >= CONFIG.fetch_timeout);
    assert_eq!(rx.borrow().stats.fetch_failures, 1);
    assert_eq!(messages(&log), vec!["OFFLINE"]);
}

#[tokio::test]
async fn disk_error_becomes_a_single_diagnostic_entry() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let log = Arc::new(TitleLog::open(
        TitleLogFile::new(blocker.join("title_changes.log"), 1000, 100),
        10,
    ));
    let (mut monitor, rx) = Monitor::new(
        ScriptedSource::new(vec![Step::Down, Step::Up("A"), Step::Up("A")]),
        Arc::clone(&log),
        FakeClock::new(),
        CONFIG,
    );

    for _ in 0..3 {
        monitor.cycle().await;
    }

    let recorded = messages(&log);
    assert_eq!(recorded.len(), 2, "{recorded:?}");
    assert_eq!(recorded[0], "ONLINE, title='A'");
    assert!(recorded[1].starts_with("Monitor error: title log write failed"), "{recorded:?}");
    assert_eq!(rx.borrow().stats.cycles, 3);
    assert_eq!(rx.borrow().status, Some(RemoteStatus::online("A")));
}

#[tokio::test(start_paused = true)]
async fn spawned_monitor_polls_until_shutdown() {
    let dir = tempdir().unwrap();
    let log = title_log(dir.path());
    let source = ScriptedSource::new(vec![Step::Down, Step::Up("Morning Show"), Step::Up("News")]);
    let handle = MonitorHandle::spawn(source, Arc::clone(&log), FakeClock::new(), CONFIG);

    let mut rx = handle.subscribe();
    let started = tokio::time::Instant::now();
    rx.wait_for(|s| s.stats.cycles >= 3).await.unwrap();

    // First poll is immediate, the next two follow at the interval
    assert!(started.elapsed() >= CONFIG.interval * 2);
    assert_eq!(handle.snapshot().status, Some(RemoteStatus::online("News")));
    assert_eq!(
        handle.log().recent(10).len(),
        2,
        "ONLINE and title change, newest first: {:?}",
        handle.log().recent(10)
    );
    assert!(handle.is_running());

    handle.shutdown().await;
    assert!(!handle.is_running());
    handle.shutdown().await;
}

#[tokio::test]
async fn snapshot_is_empty_before_first_poll() {
    let dir = tempdir().unwrap();
    let (_monitor, rx) = Monitor::new(
        ScriptedSource::new(vec![]),
        title_log(dir.path()),
        FakeClock::new(),
        CONFIG,
    );
    assert_eq!(*rx.borrow(), MonitorSnapshot::default());
}
