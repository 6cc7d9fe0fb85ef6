//! Recoverable wallet signatures.

use k256::ecdsa::{RecoveryId, Signature};

/// Size of a serialized recoverable signature: r (32) + s (32) + v (1).
pub const SIGNATURE_BYTES: usize = 65;

/// A recoverable ECDSA signature as produced by a wallet's
/// `personal_sign`.
///
/// The wire form is 65 bytes `r || s || v`, usually hex-encoded with a
/// `0x` prefix. Wallets emit `v` as either `27`/`28` (the legacy
/// convention) or raw `0`/`1`; both are accepted on parse and
/// normalized internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSignature {
    sig: Signature,
    recovery_id: RecoveryId,
}

impl WalletSignature {
    pub(crate) fn from_parts(sig: Signature, recovery_id: RecoveryId) -> Self {
        Self { sig, recovery_id }
    }

    /// Parse a signature from its 65-byte serialized form.
    ///
    /// Returns `None` if the `r`/`s` scalars are out of range or the
    /// recovery byte is not one of `0`, `1`, `27`, `28`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; SIGNATURE_BYTES]) -> Option<Self> {
        let sig = Signature::from_slice(&bytes[..64]).ok()?;
        let v = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            _ => return None,
        };
        let recovery_id = RecoveryId::from_byte(v)?;
        Some(Self { sig, recovery_id })
    }

    /// Parse a signature from hex, with or without a `0x` prefix.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; SIGNATURE_BYTES];
        hex::decode_to_slice(digits, &mut bytes).ok()?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to the 65-byte `r || s || v` wire form, with `v` in
    /// the legacy `27`/`28` convention wallets expect.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTES] {
        let mut bytes = [0u8; SIGNATURE_BYTES];
        bytes[..64].copy_from_slice(&self.sig.to_bytes());
        bytes[64] = self.recovery_id.to_byte() + 27;
        bytes
    }

    /// Serialize to `0x`-prefixed lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    pub(crate) fn signature(&self) -> &Signature {
        &self.sig
    }

    pub(crate) fn recovery_id(&self) -> RecoveryId {
        self.recovery_id
    }
}
