//! Pure authentication library for Walletgate.
//!
//! This crate is intentionally IO-free:
//! - No filesystem operations
//! - No network calls
//! - No database interactions
//! - No logging
//!
//! Everything time- or storage-dependent is injected by the caller:
//! clock values arrive as Unix-second parameters, and nonce persistence
//! lives in the service layer. What remains here is the cryptographic
//! core of the challenge-response flow:
//!
//! - [`identity`] - secp256k1 wallet keys and Ethereum-style addresses
//! - [`challenge`] - challenge messages, EIP-191 signature recovery
//! - [`session`] - signed, time-bound session credentials
//!
//! # Example
//!
//! ```ignore
//! use walletgate_auth::{identity::WalletKey, challenge::*};
//!
//! // Client signs the rendered challenge with its wallet key
//! let key = WalletKey::generate();
//! let template = ChallengeTemplate::new("portal.example");
//! let message = template.render(&nonce_hex);
//! let signature = key.sign_message(&message);
//!
//! // Server verifies the claimed address produced the signature
//! let ok = verify_claimed(&key.address(), &message, &signature)?;
//! ```

pub mod challenge;
pub mod identity;
pub mod session;

pub use challenge::{
    recover_signer, verify_claimed, ChallengeError, ChallengeNonce, ChallengeTemplate,
    WalletSignature,
};
pub use identity::{Address, IdentityError, WalletKey};
pub use session::{SessionClaims, SessionError, SessionIssuer};
