// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use fs2::FileExt;
use tempfile::tempdir;

use super::super::{Config, LifecycleError};
use super::startup;

#[tokio::test]
async fn startup_creates_layout_and_shutdown_removes_runtime_files() {
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path());

    let mut result = startup(&config).await.unwrap();

    assert!(config.socket_path.exists());
    assert!(config.run_dir.is_dir());
    assert!(config.logs_dir.is_dir());
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    // The monitor is running, so a second start is refused
    assert!(!result.daemon.controller.start_monitor());

    result.daemon.shutdown().await.unwrap();

    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
}

#[tokio::test]
async fn startup_lock_failed_does_not_remove_existing_files() {
    // Simulate a running daemon by holding the lock and creating its files.
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path());
    std::fs::write(&config.socket_path, b"").unwrap();

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)
        .unwrap();
    lock_file.lock_exclusive().unwrap();
    std::fs::write(&config.lock_path, b"12345").unwrap();

    match startup(&config).await {
        Err(LifecycleError::LockFailed(_)) => {}
        Err(e) => panic!("expected LockFailed, got: {e}"),
        Ok(_) => panic!("expected LockFailed, but startup succeeded"),
    }

    assert!(config.socket_path.exists(), "socket file must not be deleted on LockFailed");
    assert!(config.lock_path.exists(), "lock file must not be deleted on LockFailed");
    assert_eq!(std::fs::read_to_string(&config.lock_path).unwrap(), "12345");
}

#[tokio::test]
async fn invalid_settings_fail_startup_and_clean_up() {
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path());
    std::fs::write(&config.settings_path, "[monitor]\ninterval_secs = 0\n").unwrap();

    match startup(&config).await {
        Err(LifecycleError::Settings(_)) => {}
        Err(e) => panic!("expected Settings error, got: {e}"),
        Ok(_) => panic!("expected Settings error, but startup succeeded"),
    }

    assert!(!config.lock_path.exists());
    assert!(!config.socket_path.exists());
}

#[tokio::test]
async fn startup_removes_stale_pid_records_and_socket() {
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path());
    std::fs::create_dir_all(&config.run_dir).unwrap();
    std::fs::write(config.run_dir.join("yta.pid"), "999999999").unwrap();
    std::fs::write(config.run_dir.join("radio.pid"), "not a pid").unwrap();
    std::fs::write(&config.socket_path, b"stale").unwrap();

    let mut result = startup(&config).await.unwrap();

    assert!(!config.run_dir.join("yta.pid").exists());
    assert!(!config.run_dir.join("radio.pid").exists());
    // Rebound as a real socket
    assert!(tokio::net::UnixStream::connect(&config.socket_path).await.is_ok());

    result.daemon.shutdown().await.unwrap();
}
