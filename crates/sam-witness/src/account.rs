//! Key validation and address derivation
//!
//! An identity is the Ethereum-style address of a secp256k1 public key: the
//! last 20 bytes of Keccak-256 over the 64-byte uncompressed point. Text
//! addresses are canonicalized to EIP-55 checksum casing.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::{Result, WitnessError};

/// Private key length in bytes
pub const PRIVATE_KEY_LEN: usize = 32;

/// Address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// Keccak-256 digest
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// 20-byte account identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Wrap raw address bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Parse a hex address, with or without `0x`, in any casing
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| WitnessError::InvalidAddress {
            value: s.into(),
            reason: reason.into(),
        };

        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(invalid("expected 40 hex digits"));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self(bytes))
    }

    /// EIP-55 mixed-case text form with `0x` prefix
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Address read as a 160-bit unsigned integer
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// Address lifted into the BN254 scalar field (always below the modulus)
    pub fn to_field(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = WitnessError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Canonicalize checksum casing; idempotent
pub fn normalize_address(address: &str) -> Result<String> {
    Ok(Address::parse(address)?.to_checksum())
}

/// Check length and scalar range of a private key
///
/// The key must be exactly 32 bytes and a nonzero scalar below the
/// secp256k1 group order.
pub fn validate_private_key(bytes: &[u8]) -> Result<SigningKey> {
    let array: [u8; PRIVATE_KEY_LEN] = bytes.try_into().map_err(|_| WitnessError::InvalidKey {
        reason: format!(
            "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
            bytes.len()
        ),
    })?;

    SigningKey::from_bytes(&array.into()).map_err(|_| WitnessError::InvalidKey {
        reason: "private key is zero or not below the curve order".into(),
    })
}

/// Decode a public key and check it lies on the curve
///
/// Accepts SEC1 encodings (33 or 65 bytes) and bare 64-byte `X || Y`.
pub fn validate_public_key(bytes: &[u8]) -> Result<VerifyingKey> {
    let decoded = if bytes.len() == 64 {
        let mut tagged = Vec::with_capacity(65);
        tagged.push(0x04);
        tagged.extend_from_slice(bytes);
        VerifyingKey::from_sec1_bytes(&tagged)
    } else {
        VerifyingKey::from_sec1_bytes(bytes)
    };

    decoded.map_err(|_| WitnessError::InvalidKey {
        reason: format!("{}-byte public key is not a point on secp256k1", bytes.len()),
    })
}

/// Uncompressed `X || Y` without the SEC1 tag
pub fn uncompressed_public_key(key: &VerifyingKey) -> [u8; 64] {
    let encoded = key.as_affine().to_encoded_point(false);
    let mut out = [0u8; 64];
    // Uncompressed SEC1 is always 0x04 || X || Y
    out.copy_from_slice(&encoded.as_bytes()[1..]);
    out
}

/// Address of a public key
pub fn derive_address(key: &VerifyingKey) -> Address {
    derive_address_from_bytes(&uncompressed_public_key(key))
}

/// Address of an uncompressed `X || Y` public key
pub fn derive_address_from_bytes(public_key: &[u8; 64]) -> Address {
    let hash = keccak256(public_key);
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes.copy_from_slice(&hash[32 - ADDRESS_LEN..]);
    Address(bytes)
}

/// Affine coordinates of a public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCoords {
    /// X coordinate
    pub x: BigUint,
    /// Y coordinate
    pub y: BigUint,
}

impl PublicKeyCoords {
    /// Coordinates of a verifying key
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let raw = uncompressed_public_key(key);
        Self {
            x: BigUint::from_bytes_be(&raw[..32]),
            y: BigUint::from_bytes_be(&raw[32..]),
        }
    }
}

/// A validated signing identity
#[derive(Clone)]
pub struct Account {
    signing_key: SigningKey,
    address: Address,
}

impl Account {
    /// Build an account from a private key
    pub fn from_private_key(private_key: &[u8]) -> Result<Self> {
        let signing_key = validate_private_key(private_key)?;
        let address = derive_address(signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Build an account from a private key and the public key claimed for it
    pub fn from_key_pair(private_key: &[u8], public_key: &[u8]) -> Result<Self> {
        let account = Self::from_private_key(private_key)?;
        let claimed = validate_public_key(public_key)?;
        if &claimed != account.verifying_key() {
            return Err(WitnessError::InvalidKey {
                reason: "public key does not belong to the private key".into(),
            });
        }
        Ok(account)
    }

    /// Fresh account from the thread-local CSPRNG
    pub fn random() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let address = derive_address(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Verifying key
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Raw private key bytes
    pub fn private_key_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        let mut out = [0u8; PRIVATE_KEY_LEN];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// Public key coordinates
    pub fn public_key(&self) -> PublicKeyCoords {
        PublicKeyCoords::from_verifying_key(self.verifying_key())
    }

    /// Derived address
    pub fn address(&self) -> Address {
        self.address
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
