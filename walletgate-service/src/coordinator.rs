//! Challenge-response login coordinator.
//!
//! Drives the full flow: issue a challenge, verify the wallet's
//! signature over it, consume the nonce atomically, auto-register the
//! user, and hand back a signed session. Every verification attempt is
//! recorded in the attempt log with a stable error code.

use std::sync::Arc;

use walletgate_auth::identity::Address;
use walletgate_auth::{
    verify_claimed, ChallengeTemplate, SessionClaims, SessionError, SessionIssuer,
    WalletSignature,
};

use crate::attempt_log::AttemptLog;
use crate::clock::Clock;
use crate::nonce_store::{NonceStore, NonceStoreError};
use crate::rate_limit::AttemptLimiter;
use crate::users::UserStore;

/// Authentication method recorded in sessions and telemetry.
pub const AUTH_METHOD: &str = "DID";

/// Coordinator configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// Domain name embedded in challenge messages.
    pub domain: String,
    /// HMAC secret for session credentials.
    pub session_secret: Vec<u8>,
    /// Session lifetime in seconds.
    pub session_ttl_seconds: i64,
    /// Challenge validity window in seconds.
    pub nonce_validity_seconds: i64,
    /// Verification attempts allowed per address per minute.
    pub attempts_per_minute: u32,
}

impl AuthConfig {
    /// Config with production defaults: 5-minute challenges, 2-hour
    /// sessions, 5 verification attempts per minute per address.
    #[must_use]
    pub fn new(domain: impl Into<String>, session_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            domain: domain.into(),
            session_secret: session_secret.into(),
            session_ttl_seconds: 7200,
            nonce_validity_seconds: 300,
            attempts_per_minute: 5,
        }
    }
}

/// Whether an error is the caller's to fix or the operator's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request was understood and correctly refused; the caller
    /// can change something and retry.
    Usability,
    /// The service itself failed; retrying may help, fixing the
    /// request will not.
    System,
}

/// Errors from the login flow.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthFlowError {
    /// The claimed wallet address does not parse.
    #[error("invalid wallet address")]
    InvalidIdentity,
    /// The signature is not a validly shaped recoverable signature.
    #[error("malformed signature")]
    MalformedSignature,
    /// No challenge has been issued for this address.
    #[error("no active challenge")]
    NoActiveChallenge,
    /// The challenge's validity window elapsed before submission.
    #[error("challenge expired")]
    ChallengeExpired,
    /// The challenge was already consumed by an earlier login.
    #[error("challenge already used")]
    ChallengeAlreadyUsed,
    /// The signature is well-formed but was not produced by the
    /// claimed address.
    #[error("signature does not match claimed address")]
    SignatureMismatch,
    /// Too many verification attempts for this address.
    #[error("too many attempts")]
    TooManyAttempts,
    /// The session credential could not be encoded.
    #[error("session issuance failed")]
    SessionIssuance,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AuthFlowError {
    /// Coarse classification for logging and response mapping.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentity
            | Self::MalformedSignature
            | Self::NoActiveChallenge
            | Self::ChallengeExpired
            | Self::ChallengeAlreadyUsed
            | Self::SignatureMismatch
            | Self::TooManyAttempts => ErrorCategory::Usability,
            Self::SessionIssuance | Self::Storage(_) => ErrorCategory::System,
        }
    }

    /// Stable code recorded in the attempt log.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentity => "INVALID_IDENTITY",
            Self::MalformedSignature => "MALFORMED_SIGNATURE",
            Self::NoActiveChallenge => "NO_ACTIVE_CHALLENGE",
            Self::ChallengeExpired => "CHALLENGE_EXPIRED",
            Self::ChallengeAlreadyUsed => "CHALLENGE_ALREADY_USED",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::SessionIssuance => "SESSION_ISSUANCE",
            Self::Storage(_) => "STORAGE",
        }
    }
}

/// A freshly issued challenge, ready to present to the wallet.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub address: Address,
    /// Nonce in the hex form embedded in the message.
    pub nonce: String,
    /// The exact text the wallet must sign.
    pub message: String,
    /// Unix seconds after which the challenge no longer verifies.
    pub expires_at: i64,
}

/// A successful login: the session credential plus its claims.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub address: Address,
    pub role: String,
    /// Signed session credential for later requests.
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Coordinates the challenge-response login flow.
pub struct ChallengeCoordinator {
    nonces: NonceStore,
    users: UserStore,
    attempts: AttemptLog,
    limiter: AttemptLimiter,
    template: ChallengeTemplate,
    sessions: SessionIssuer,
    clock: Arc<dyn Clock>,
    session_ttl_seconds: i64,
}

impl ChallengeCoordinator {
    /// Build a coordinator over a shared pool, creating tables as
    /// needed.
    pub async fn new(
        pool: sqlx::SqlitePool,
        config: AuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthFlowError> {
        let nonces = NonceStore::new(pool.clone(), config.nonce_validity_seconds)
            .await
            .map_err(flatten_store_error)?;
        let users = UserStore::new(pool.clone()).await?;
        let attempts = AttemptLog::new(pool).await?;

        Ok(Self {
            nonces,
            users,
            attempts,
            limiter: AttemptLimiter::new(config.attempts_per_minute),
            template: ChallengeTemplate::new(config.domain),
            sessions: SessionIssuer::new(&config.session_secret, config.session_ttl_seconds),
            clock,
            session_ttl_seconds: config.session_ttl_seconds,
        })
    }

    /// The nonce store, for wiring up the background sweeper.
    #[must_use]
    pub fn nonce_store(&self) -> &NonceStore {
        &self.nonces
    }

    /// The rate limiter, for wiring up the background sweeper.
    #[must_use]
    pub fn attempt_limiter(&self) -> &AttemptLimiter {
        &self.limiter
    }

    /// Issue a fresh challenge for the claimed address.
    ///
    /// Requesting again before the previous challenge is consumed
    /// supersedes it: only the latest challenge verifies.
    pub async fn request_challenge(&self, claimed: &str) -> Result<IssuedChallenge, AuthFlowError> {
        let address = Address::parse(claimed).map_err(|_| AuthFlowError::InvalidIdentity)?;
        let now = self.clock.now_unix();

        let (nonce, expires_at) = self
            .nonces
            .issue(&address, now)
            .await
            .map_err(flatten_store_error)?;
        let nonce_hex = nonce.to_hex();
        let message = self.template.render(&nonce_hex);

        tracing::info!(address = %address, expires_at, "challenge issued");

        Ok(IssuedChallenge {
            address,
            nonce: nonce_hex,
            message,
            expires_at,
        })
    }

    /// Verify a signed challenge and establish a session.
    ///
    /// `telemetry` is an opaque caller-supplied payload persisted
    /// alongside the outcome; the coordinator never interprets it. The
    /// outcome, success or failure, is recorded in the attempt log with
    /// a stable error code.
    pub async fn submit(
        &self,
        claimed: &str,
        signature: &str,
        telemetry: &serde_json::Value,
    ) -> Result<VerifiedSession, AuthFlowError> {
        let now = self.clock.now_unix();

        match self.verify_and_issue(claimed, signature, now).await {
            Ok(session) => {
                // The nonce is consumed and the session minted; a
                // telemetry write failure must not turn that into an
                // error for the caller.
                if let Err(log_err) = self
                    .attempts
                    .record(
                        Some(&session.address.canonical_hex()),
                        true,
                        None,
                        telemetry,
                        now,
                    )
                    .await
                {
                    tracing::error!(error = %log_err, "failed to record login attempt");
                }
                tracing::info!(address = %session.address, "wallet login verified");
                Ok(session)
            }
            Err(err) => {
                // Failed logging must never mask the auth error.
                let address = Address::parse(claimed).ok().map(|a| a.canonical_hex());
                if let Err(log_err) = self
                    .attempts
                    .record(address.as_deref(), false, Some(err.code()), telemetry, now)
                    .await
                {
                    tracing::error!(error = %log_err, "failed to record login attempt");
                }
                tracing::warn!(
                    address = address.as_deref().unwrap_or("<unparseable>"),
                    code = err.code(),
                    "wallet login rejected"
                );
                Err(err)
            }
        }
    }

    async fn verify_and_issue(
        &self,
        claimed: &str,
        signature: &str,
        now: i64,
    ) -> Result<VerifiedSession, AuthFlowError> {
        let address = Address::parse(claimed).map_err(|_| AuthFlowError::InvalidIdentity)?;

        if !self.limiter.check(&address.canonical_hex()) {
            return Err(AuthFlowError::TooManyAttempts);
        }

        let signature =
            WalletSignature::from_hex(signature).ok_or(AuthFlowError::MalformedSignature)?;

        // The latest row is fetched regardless of state so replay and
        // expiry are distinguishable, and both are rejected before any
        // signature work.
        let record = self
            .nonces
            .latest(&address)
            .await
            .map_err(flatten_store_error)?
            .ok_or(AuthFlowError::NoActiveChallenge)?;
        if record.used_at.is_some() {
            return Err(AuthFlowError::ChallengeAlreadyUsed);
        }
        if record.expires_at <= now {
            return Err(AuthFlowError::ChallengeExpired);
        }

        let message = self.template.render(&record.nonce);
        match verify_claimed(&address, &message, &signature) {
            Ok(true) => {}
            Ok(false) => return Err(AuthFlowError::SignatureMismatch),
            Err(_) => return Err(AuthFlowError::MalformedSignature),
        }

        // Consume only after the signature checks out; the conditional
        // update still guards against a concurrent winner.
        self.nonces
            .consume(&address, &record.nonce, now)
            .await
            .map_err(flatten_store_error)?;

        let user = self.users.ensure_user(&address, now).await?;
        let token = self
            .sessions
            .issue(&address, &user.role, AUTH_METHOD, now)
            .map_err(|_| AuthFlowError::SessionIssuance)?;

        Ok(VerifiedSession {
            address,
            role: user.role,
            token,
            issued_at: now,
            expires_at: now + self.session_ttl_seconds,
        })
    }

    /// Validate a previously issued session credential.
    pub fn validate_session(&self, token: &str) -> Result<SessionClaims, SessionError> {
        self.sessions.validate(token, self.clock.now_unix())
    }
}

fn flatten_store_error(err: NonceStoreError) -> AuthFlowError {
    match err {
        NonceStoreError::NotFound => AuthFlowError::NoActiveChallenge,
        NonceStoreError::Expired => AuthFlowError::ChallengeExpired,
        NonceStoreError::AlreadyUsed => AuthFlowError::ChallengeAlreadyUsed,
        NonceStoreError::Database(e) => AuthFlowError::Storage(e),
    }
}
