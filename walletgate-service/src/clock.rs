//! Time source abstraction.
//!
//! Every store and the coordinator read the current time through this
//! trait rather than the system clock, so expiry and replay behavior
//! can be driven deterministically in tests.

use std::sync::atomic::{AtomicI64, Ordering};

/// A source of Unix-second timestamps.
pub trait Clock: Send + Sync {
    /// Current time as Unix seconds.
    fn now_unix(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_secs() as i64
    }
}

/// A clock that only moves when told to. Intended for tests.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    /// Create a clock frozen at the given instant.
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    /// Advance by a number of seconds.
    pub fn advance(&self, seconds: i64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_unix(), 100);

        clock.advance(50);
        assert_eq!(clock.now_unix(), 150);

        clock.set(1_000);
        assert_eq!(clock.now_unix(), 1_000);
    }

    #[test]
    fn test_system_clock_is_sane() {
        // After 2020, before 2100.
        let now = SystemClock.now_unix();
        assert!(now > 1_577_836_800);
        assert!(now < 4_102_444_800);
    }
}
