//! EIP-191 signer recovery and address comparison.

use k256::ecdsa::VerifyingKey;
use sha3::{Digest, Keccak256};

use crate::identity::Address;

use super::{ChallengeError, WalletSignature};

/// The byte prefix `personal_sign` prepends before hashing, preventing
/// a signed challenge from doubling as a valid transaction signature.
const EIP191_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Keccak-256 digest of the EIP-191 envelope around `message`.
///
/// The envelope is `prefix || decimal byte length || message`; the
/// length is of the UTF-8 bytes, not the character count.
pub(crate) fn eip191_digest(message: &str) -> Keccak256 {
    let mut hasher = Keccak256::new_with_prefix(EIP191_PREFIX);
    hasher.update(message.len().to_string());
    hasher.update(message.as_bytes());
    hasher
}

/// Recover the address that signed `message` under EIP-191.
///
/// # Errors
///
/// Returns `ChallengeError::MalformedSignature` if no public key can be
/// recovered from the signature over this digest.
pub fn recover_signer(
    message: &str,
    signature: &WalletSignature,
) -> Result<Address, ChallengeError> {
    let key = VerifyingKey::recover_from_digest(
        eip191_digest(message),
        signature.signature(),
        signature.recovery_id(),
    )
    .map_err(|_| ChallengeError::MalformedSignature)?;
    Ok(Address::from_verifying_key(&key))
}

/// Check whether `signature` over `message` was produced by the key
/// controlling `claimed`.
///
/// A well-formed signature from a different key yields `Ok(false)`, not
/// an error; the comparison itself is constant-time.
///
/// # Errors
///
/// Returns `ChallengeError::MalformedSignature` if the signature cannot
/// be recovered at all.
pub fn verify_claimed(
    claimed: &Address,
    message: &str,
    signature: &WalletSignature,
) -> Result<bool, ChallengeError> {
    let recovered = recover_signer(message, signature)?;
    Ok(recovered == *claimed)
}
