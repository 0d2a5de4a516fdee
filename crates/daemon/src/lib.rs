// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cast daemon library
//!
//! Process supervision, log store, status monitor, title push and host
//! readout behind the `castd` control socket.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod controller;
pub mod env;
pub mod health;
pub mod lifecycle;
pub mod listener;
pub mod log_store;
pub mod monitor;
pub mod remote;
pub mod settings;
pub mod supervisor;
pub mod title_push;

pub use controller::{ControlError, Controller, ControllerParts};
pub use lifecycle::{startup, Config, DaemonController, DaemonState, LifecycleError, StartupResult};
pub use listener::{ListenCtx, Listener};
