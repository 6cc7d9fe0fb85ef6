//! Ethereum-style addresses derived from secp256k1 public keys.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;

use super::IdentityError;

/// Length of an address in raw bytes.
pub const ADDRESS_BYTES: usize = 20;

/// A 20-byte wallet address naming the holder of a signing key.
///
/// Addresses are case-insensitive in canonical form: `parse` accepts
/// any casing (including checksummed mixed case) and normalizes it, so
/// two spellings of the same address always compare equal. Whether a
/// claimed address actually controls the key is established by
/// signature recovery, never by the input casing.
///
/// # Security
///
/// Equality uses constant-time comparison. The Hash derive is kept
/// because the address itself is public information; only equality
/// needs timing-attack protection.
#[derive(Clone, Copy, Eq, Hash)]
#[allow(clippy::derived_hash_with_manual_eq)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Parse an address from a `0x`-prefixed hex string.
    ///
    /// Accepts any casing; mixed-case input is normalized rather than
    /// checksum-validated.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::MissingHexPrefix` without the `0x` prefix,
    /// `InvalidLength` for anything other than 40 hex digits, and
    /// `InvalidHex` for non-hex characters.
    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(IdentityError::MissingHexPrefix)?;

        if digits.len() != ADDRESS_BYTES * 2 {
            return Err(IdentityError::InvalidLength {
                expected: ADDRESS_BYTES * 2,
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| IdentityError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Create an address from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Derive the address from a secp256k1 verifying key.
    ///
    /// The address is the last 20 bytes of the Keccak-256 hash of the
    /// uncompressed public key point (without the SEC1 `0x04` tag).
    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// Get the raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Canonical lowercase hex form (`0x` + 40 lowercase digits).
    ///
    /// Used as the storage key wherever addresses index persistent state.
    #[must_use]
    pub fn canonical_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum encoding.
    ///
    /// A hex letter is uppercased when the corresponding nibble of the
    /// Keccak-256 hash of the lowercase hex digits is >= 8.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        let digits = hex::encode(self.0);
        let hash = Keccak256::digest(digits.as_bytes());

        let mut out = String::with_capacity(2 + digits.len());
        out.push_str("0x");
        for (i, c) in digits.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::str::FromStr for Address {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known EIP-55 test vector.
    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_parse_accepts_any_casing() {
        let lower = Address::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        let upper = Address::parse(&CHECKSUMMED.to_uppercase().replace("0X", "0x")).unwrap();
        let mixed = Address::parse(CHECKSUMMED).unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_checksum_round_trip() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        assert_eq!(addr.to_checksum(), CHECKSUMMED);
    }

    #[test]
    fn test_canonical_hex_is_lowercase() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        let canonical = addr.canonical_hex();
        assert_eq!(canonical, CHECKSUMMED.to_lowercase());
        assert!(canonical.starts_with("0x"));
        assert_eq!(canonical.len(), 42);
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let bare = &CHECKSUMMED[2..];
        assert_eq!(
            Address::parse(bare),
            Err(IdentityError::MissingHexPrefix)
        );
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            Address::parse("0xabc"),
            Err(IdentityError::InvalidLength { .. })
        ));
        assert!(matches!(
            Address::parse(&format!("{}00", CHECKSUMMED)),
            Err(IdentityError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let bad = format!("0x{}", "zz".repeat(20));
        assert_eq!(Address::parse(&bad), Err(IdentityError::InvalidHex));
    }

    #[test]
    fn test_serde_round_trip() {
        let addr = Address::parse(CHECKSUMMED).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", CHECKSUMMED));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
