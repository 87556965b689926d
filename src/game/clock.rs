//! Time sources for the frame driver.
//!
//! The game model never reads the wall clock itself; drivers sample a
//! `TimeSource` each frame and hand the result to `GameModel::tick`.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Supplies the current time as an offset from an arbitrary fixed origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new(start: Duration) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
