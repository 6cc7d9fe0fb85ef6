//! Random challenge nonce values.

use rand::rngs::OsRng;
use rand::RngCore;

/// Size of a challenge nonce in raw bytes (256 bits of entropy).
pub const NONCE_BYTES: usize = 32;

/// A single-use random challenge value.
///
/// The nonce travels as 64 lowercase hex characters; that hex form is
/// what gets embedded in the rendered challenge message and persisted
/// by the nonce store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeNonce([u8; NONCE_BYTES]);

impl ChallengeNonce {
    /// Generate a new nonce from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; NONCE_BYTES]) -> Self {
        Self(bytes)
    }

    /// Parse a nonce from its 64-character hex form.
    ///
    /// Returns `None` if the string is not exactly 64 hex digits.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let mut bytes = [0u8; NONCE_BYTES];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    /// Get the raw nonce bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_BYTES] {
        &self.0
    }

    /// Hex form used in challenge messages and storage.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ChallengeNonce {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_hex_length() {
        let nonce = ChallengeNonce::new();
        assert_eq!(nonce.to_hex().len(), NONCE_BYTES * 2);
    }

    #[test]
    fn test_nonce_uniqueness() {
        assert_ne!(ChallengeNonce::new(), ChallengeNonce::new());
    }

    #[test]
    fn test_nonce_hex_round_trip() {
        let nonce = ChallengeNonce::new();
        let parsed = ChallengeNonce::from_hex(&nonce.to_hex()).unwrap();
        assert_eq!(nonce, parsed);
    }
}
