//! Time source for the wait loop.
//!
//! The wait loop reads time and sleeps only through [`Clock`], so tests can
//! swap in a [`ManualClock`] whose sleeps advance virtual time instantly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source with a blocking sleep
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    #[must_use]
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

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock for deterministic tests.
///
/// Clones share the same time, so a test can hand one clone to the
/// application and keep another to inspect or advance.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<ManualClockState>,
}

#[derive(Debug, Default)]
struct ManualClockState {
    now: Cell<Duration>,
    sleeps: Cell<usize>,
}

impl ManualClock {
    /// Create a clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without counting a sleep
    pub fn advance(&self, by: Duration) {
        self.state.now.set(self.state.now.get() + by);
    }

    /// Number of times [`Clock::sleep`] was called
    #[must_use]
    pub fn sleeps(&self) -> usize {
        self.state.sleeps.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.state.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.state.sleeps.set(self.state.sleeps.get() + 1);
        self.advance(duration);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod manual_clock_tests {
        use super::*;

        #[test]
        fn test_starts_at_zero() {
            let clock = ManualClock::new();
            assert_eq!(clock.now(), Duration::ZERO);
            assert_eq!(clock.sleeps(), 0);
        }

        #[test]
        fn test_sleep_advances_and_counts() {
            let clock = ManualClock::new();
            clock.sleep(Duration::from_millis(100));
            clock.sleep(Duration::from_millis(50));
            assert_eq!(clock.now(), Duration::from_millis(150));
            assert_eq!(clock.sleeps(), 2);
        }

        #[test]
        fn test_advance_is_not_a_sleep() {
            let clock = ManualClock::new();
            clock.advance(Duration::from_secs(2));
            assert_eq!(clock.now(), Duration::from_secs(2));
            assert_eq!(clock.sleeps(), 0);
        }

        #[test]
        fn test_clones_share_time() {
            let clock = ManualClock::new();
            let other = clock.clone();
            other.sleep(Duration::from_secs(1));
            assert_eq!(clock.now(), Duration::from_secs(1));
            assert_eq!(clock.sleeps(), 1);
        }
    }

    mod system_clock_tests {
        use super::*;

        #[test]
        fn test_sleep_elapses_real_time() {
            let clock = SystemClock::new();
            clock.sleep(Duration::from_millis(10));
            assert!(clock.now() >= Duration::from_millis(10));
        }
    }
}
