//! Per-wallet rate limiting for login attempts.
//!
//! Brute-forcing a signature is hopeless, but unlimited attempts still
//! let an attacker hammer the verification path and flood the attempt
//! log. Attempts are throttled per canonical address so one noisy
//! wallet cannot lock out everyone else.

use governor::{
    clock::DefaultClock,
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Keyed rate limiter over canonical wallet addresses.
pub struct AttemptLimiter {
    limiter: Arc<RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>>,
}

impl AttemptLimiter {
    /// Create a limiter allowing `per_minute` verification attempts per
    /// address, with the same value as the burst size.
    pub fn new(per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::new(5).unwrap());
        let quota = Quota::per_minute(per_minute).allow_burst(per_minute);

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Check whether another attempt by this address is allowed.
    pub fn check(&self, address: &str) -> bool {
        self.limiter.check_key(&address.to_string()).is_ok()
    }

    /// Drop per-key state that has fully refilled.
    ///
    /// Called from the background sweeper so the key table does not
    /// grow with every address ever seen.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }
}

impl Clone for AttemptLimiter {
    fn clone(&self) -> Self {
        Self {
            limiter: Arc::clone(&self.limiter),
        }
    }
}
