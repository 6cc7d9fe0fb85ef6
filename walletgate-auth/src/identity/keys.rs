//! Wallet signing keys.
//!
//! In production the private key lives inside the user's wallet and the
//! server only ever sees signatures. `WalletKey` exists for the client
//! side of the protocol and for exercising the server-side verification
//! path in tests.

use k256::ecdsa::SigningKey;
use sha3::Keccak256;
use zeroize::Zeroizing;

use crate::challenge::{eip191_digest, WalletSignature};

use super::{Address, IdentityError};

/// A private secp256k1 signing key controlling one [`Address`].
///
/// # Security
///
/// - The inner `SigningKey` zeroizes its scalar on drop
/// - No `Debug` implementation to prevent accidental logging
pub struct WalletKey(SigningKey);

// Explicitly NO Debug implementation for WalletKey

impl WalletKey {
    /// Generate a new random wallet key.
    #[must_use]
    pub fn generate() -> Self {
        Self(SigningKey::random(&mut rand::rngs::OsRng))
    }

    /// Load a wallet key from a raw 32-byte scalar.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidLength` if the slice is not exactly
    /// 32 bytes, or `IdentityError::InvalidKey` if the scalar is zero or
    /// exceeds the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdentityError> {
        if bytes.len() != 32 {
            return Err(IdentityError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let key = SigningKey::from_slice(bytes).map_err(|_| IdentityError::InvalidKey)?;
        Ok(Self(key))
    }

    /// Derive the address controlled by this key.
    #[must_use]
    pub fn address(&self) -> Address {
        Address::from_verifying_key(self.0.verifying_key())
    }

    /// Sign a challenge message the way a wallet's `personal_sign` does:
    /// EIP-191 prefixing, Keccak-256, recoverable ECDSA.
    ///
    /// # Panics
    ///
    /// Panics only if signing fails for a valid key, which secp256k1
    /// ECDSA with RFC 6979 nonces cannot do.
    #[must_use]
    pub fn sign_message(&self, message: &str) -> WalletSignature {
        let digest: Keccak256 = eip191_digest(message);
        let (signature, recovery_id) = self
            .0
            .sign_digest_recoverable(digest)
            .expect("secp256k1 signing cannot fail for a valid key");
        WalletSignature::from_parts(signature, recovery_id)
    }

    /// Export the raw private scalar bytes.
    ///
    /// # Security
    ///
    /// The returned buffer zeroizes itself on drop; avoid copying it
    /// into longer-lived storage.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.0.to_bytes().into())
    }
}
