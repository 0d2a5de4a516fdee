// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let debug = format!("{:?}", styles());
    std::env::remove_var("COLOR");

    assert_ne!(debug, format!("{:?}", clap::builder::styling::Styles::plain()));
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    let debug = format!("{:?}", styles());
    std::env::remove_var("NO_COLOR");

    assert_eq!(debug, format!("{:?}", clap::builder::styling::Styles::plain()));
}

#[test]
#[serial]
fn helpers_produce_ansi_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let head = header("TARGET");
    let dim = muted("3s ago");
    std::env::remove_var("COLOR");

    assert_eq!(head, "\x1b[38;5;74mTARGET\x1b[0m");
    assert_eq!(dim, "\x1b[38;5;240m3s ago\x1b[0m");
}

#[test]
#[serial]
fn helpers_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    let head = header("TARGET");
    let dim = muted("3s ago");
    std::env::remove_var("NO_COLOR");

    assert_eq!(head, "TARGET");
    assert_eq!(dim, "3s ago");
}

#[test]
#[serial]
fn no_color_overrides_color_force() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");

    let colorize = should_colorize();
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");

    assert!(!colorize);
}
