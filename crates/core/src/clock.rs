// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction so timestamped output is testable.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time.
pub trait Clock: Clone + Send + Sync + 'static {
    fn epoch_ms(&self) -> u64;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::Clock;

    /// Controllable clock for tests; clones share the same time.
    #[derive(Clone, Debug)]
    pub struct FakeClock {
        epoch_ms: Arc<Mutex<u64>>,
    }

    impl FakeClock {
        /// 2026-01-01T00:00:00Z
        pub const START_MS: u64 = 1_767_225_600_000;

        pub fn new() -> Self {
            Self { epoch_ms: Arc::new(Mutex::new(Self::START_MS)) }
        }

        pub fn advance(&self, by: Duration) {
            *self.epoch_ms.lock() += by.as_millis() as u64;
        }

        pub fn set_epoch_ms(&self, ms: u64) {
            *self.epoch_ms.lock() = ms;
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for FakeClock {
        fn epoch_ms(&self) -> u64 {
            *self.epoch_ms.lock()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
