//! Signed, time-bound auth sessions.
//!
//! A verified challenge is exchanged for an HS256-signed credential the
//! client presents on later requests. Validation takes the current time
//! as a parameter rather than reading the system clock, so expiry
//! behavior is fully testable.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::identity::Address;

/// Claims carried inside a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Canonical lowercase hex wallet address this session belongs to.
    pub sub: String,
    /// Role granted to the subject at sign-in.
    pub role: String,
    /// How the subject authenticated, e.g. `"DID"`.
    pub auth_method: String,
    /// Unix seconds at issuance.
    pub iat: i64,
    /// Unix seconds after which the session is no longer valid.
    pub exp: i64,
}

/// Session credential errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The credential's signature or structure is invalid.
    #[error("invalid session token")]
    InvalidToken,

    /// The credential was valid but its lifetime has elapsed.
    #[error("session expired")]
    Expired,

    /// The claims could not be encoded into a token.
    #[error("session encoding failed")]
    Encoding,
}

/// Issues and validates signed session credentials.
///
/// Holds the HMAC secret in both encoding and decoding form; one issuer
/// is shared across the service.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl SessionIssuer {
    /// Create an issuer from a shared secret and session lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_seconds,
        }
    }

    /// Issue a credential for `address`, valid from `now` for the
    /// configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Encoding` if serialization fails.
    pub fn issue(
        &self,
        address: &Address,
        role: &str,
        auth_method: &str,
        now: i64,
    ) -> Result<String, SessionError> {
        let claims = SessionClaims {
            sub: address.canonical_hex(),
            role: role.to_string(),
            auth_method: auth_method.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| SessionError::Encoding)
    }

    /// Validate a credential at time `now` and return its claims.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidToken` if the signature, structure, or
    ///   algorithm is wrong
    /// - `SessionError::Expired` if `exp` is not after `now`
    pub fn validate(&self, token: &str, now: i64) -> Result<SessionClaims, SessionError> {
        // Expiry is checked against the caller's clock below, not the
        // library's view of the system time.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|_| SessionError::InvalidToken)?;

        if data.claims.exp <= now {
            return Err(SessionError::Expired);
        }
        Ok(data.claims)
    }
}
