//! Challenge-response wallet authentication service.
//!
//! Wires the pure [`walletgate_auth`] primitives to persistent state:
//! SQLite-backed nonce storage, auto-registered wallet users, an
//! attempt log for telemetry, and per-identity rate limiting. The
//! [`ChallengeCoordinator`] drives the whole flow:
//!
//! 1. `request_challenge` issues a fresh single-use nonce and renders
//!    the message the wallet must sign
//! 2. `submit` verifies the signature against the latest outstanding
//!    challenge, consumes it atomically, and returns a signed session
//! 3. `validate_session` checks a previously issued session credential
//!
//! All time-dependent behavior goes through the [`Clock`] trait so
//! expiry paths are testable without sleeping.

pub mod attempt_log;
pub mod clock;
pub mod coordinator;
pub mod db;
pub mod nonce_store;
pub mod rate_limit;
pub mod sweeper;
pub mod users;

pub use attempt_log::{AttemptLog, AttemptRecord};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{
    AuthConfig, AuthFlowError, ChallengeCoordinator, ErrorCategory, IssuedChallenge,
    VerifiedSession, AUTH_METHOD,
};
pub use db::open_pool;
pub use nonce_store::{NonceRecord, NonceStore, NonceStoreError};
pub use sweeper::spawn_sweeper;
pub use users::{UserRecord, UserStore, DEFAULT_ROLE};
