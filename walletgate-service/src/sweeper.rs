//! Background expiry sweeper.
//!
//! Expired challenges stay queryable until swept so late submissions
//! get a precise "expired" answer; the sweeper bounds how long those
//! rows accumulate. It also prunes idle rate-limiter state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::nonce_store::NonceStore;
use crate::rate_limit::AttemptLimiter;

/// Spawn the periodic sweep task.
///
/// Runs until the returned handle is aborted or the runtime shuts
/// down. Sweep failures are logged and retried on the next tick.
pub fn spawn_sweeper(
    nonces: NonceStore,
    limiter: AttemptLimiter,
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a fresh start
        // does not sweep before anything could expire.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match nonces.sweep_expired(clock.now_unix()).await {
                Ok(0) => {}
                Ok(removed) => {
                    tracing::debug!(removed, "swept expired challenges");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "challenge sweep failed");
                }
            }

            limiter.prune();
        }
    })
}
