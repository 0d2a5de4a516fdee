// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cast-core: shared types for the cast broadcast supervisor

pub mod clock;
pub mod command;
pub mod credentials;
pub mod status;
pub mod target;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use clock::{Clock, SystemClock};
pub use command::{build_command, CommandConfig, CommandError};
pub use credentials::{mask, CredentialError, KeyStore, Keys};
pub use status::{HostHealth, MonitorStats, RemoteStatus, TargetStatus};
pub use target::{KeySlot, ParseTargetError, TargetId};
pub use time_fmt::{format_elapsed, format_local_timestamp};
