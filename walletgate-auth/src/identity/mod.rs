//! Cryptographic identity types for wallet authentication.
//!
//! Identities are secp256k1 keypairs presented as Ethereum-style
//! addresses:
//! - Addresses are stored canonically and compared case-insensitively
//!   in constant time
//! - Display uses the EIP-55 mixed-case checksum encoding
//! - Private key material is zeroized on drop and never printed

mod address;
mod keys;

pub use address::Address;
pub use keys::WalletKey;

/// Errors that can occur while parsing identities or key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IdentityError {
    /// The address string does not start with `0x`.
    #[error("address missing 0x prefix")]
    MissingHexPrefix,

    /// The provided bytes or string have an invalid length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The string contains non-hexadecimal characters.
    #[error("invalid hex encoding")]
    InvalidHex,

    /// The provided bytes do not represent a valid secp256k1 key.
    #[error("invalid key format")]
    InvalidKey,
}
