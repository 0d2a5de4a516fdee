// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serial_test::serial;

use super::*;

#[test]
fn paths_are_rooted_at_state_dir() {
    let config = Config::for_state_dir(Path::new("/srv/cast"));

    assert_eq!(config.socket_path, Path::new("/srv/cast/daemon.sock"));
    assert_eq!(config.lock_path, Path::new("/srv/cast/daemon.pid"));
    assert_eq!(config.log_path, Path::new("/srv/cast/daemon.log"));
    assert_eq!(config.run_dir, Path::new("/srv/cast/run"));
    assert_eq!(config.logs_dir, Path::new("/srv/cast/logs"));
    assert_eq!(config.keys_path, Path::new("/srv/cast/keys.env"));
    assert_eq!(config.title_log_path, Path::new("/srv/cast/title_changes.log"));
    assert_eq!(config.settings_path, Path::new("/srv/cast/cast.toml"));
}

#[test]
#[serial]
fn load_honours_state_dir_and_config_overrides() {
    std::env::set_var("CAST_STATE_DIR", "/var/lib/cast");
    std::env::set_var("CAST_CONFIG", "/etc/cast.toml");

    let config = Config::load().unwrap();

    std::env::remove_var("CAST_STATE_DIR");
    std::env::remove_var("CAST_CONFIG");
    assert_eq!(config.state_dir, Path::new("/var/lib/cast"));
    assert_eq!(config.socket_path, Path::new("/var/lib/cast/daemon.sock"));
    assert_eq!(config.settings_path, Path::new("/etc/cast.toml"));
}

#[test]
#[serial]
fn load_defaults_settings_into_state_dir() {
    std::env::set_var("CAST_STATE_DIR", "/var/lib/cast");
    std::env::remove_var("CAST_CONFIG");

    let config = Config::load().unwrap();

    std::env::remove_var("CAST_STATE_DIR");
    assert_eq!(config.settings_path, Path::new("/var/lib/cast/cast.toml"));
}
