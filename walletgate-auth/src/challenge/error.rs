//! Challenge verification error types.

/// Errors that can occur during signature parsing and recovery.
///
/// A well-formed signature from the wrong key is NOT an error; it is a
/// normal `false` from [`verify_claimed`](super::verify_claimed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ChallengeError {
    /// The signature is not a validly shaped recoverable ECDSA tuple:
    /// wrong length, unparseable hex, out-of-range scalar, or an
    /// invalid recovery id.
    #[error("malformed signature")]
    MalformedSignature,
}
