//! Deterministic secp256k1 signing of a message hash
//!
//! Nonces follow RFC 6979, so the same key and hash always give the same
//! signature. Signatures are low-S normalized and carry a recovery id.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::account::PublicKeyCoords;
use crate::bigint::{to_be_bytes32, WORD_BYTES};
use crate::error::{Result, WitnessError};

/// secp256k1 group order, big-endian
const CURVE_ORDER_BE: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// secp256k1 group order
pub fn curve_order() -> BigUint {
    BigUint::from_bytes_be(&CURVE_ORDER_BE)
}

/// Message hash as supplied by the caller
///
/// Both forms normalize through [`MessageHash::normalize`] to the same 32
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "snake_case")]
pub enum MessageHash {
    /// 64 hex digits, `0x` prefix optional
    Hex(String),
    /// 32 raw bytes
    Bytes(Vec<u8>),
}

impl MessageHash {
    /// Canonical 32-byte digest
    pub fn normalize(&self) -> Result<[u8; WORD_BYTES]> {
        let mut out = [0u8; WORD_BYTES];
        match self {
            Self::Hex(s) => {
                let digits = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                if digits.len() != WORD_BYTES * 2 {
                    return Err(WitnessError::InvalidMsgHash {
                        reason: format!(
                            "expected {} hex digits, got {}",
                            WORD_BYTES * 2,
                            digits.len()
                        ),
                    });
                }
                hex::decode_to_slice(digits, &mut out).map_err(|e| {
                    WitnessError::InvalidMsgHash {
                        reason: e.to_string(),
                    }
                })?;
            }
            Self::Bytes(bytes) => {
                if bytes.len() != WORD_BYTES {
                    return Err(WitnessError::InvalidMsgHash {
                        reason: format!("expected {WORD_BYTES} bytes, got {}", bytes.len()),
                    });
                }
                out.copy_from_slice(bytes);
            }
        }
        Ok(out)
    }
}

impl From<[u8; WORD_BYTES]> for MessageHash {
    fn from(bytes: [u8; WORD_BYTES]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<&str> for MessageHash {
    fn from(s: &str) -> Self {
        Self::Hex(s.to_string())
    }
}

/// ECDSA signature scalars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// r scalar
    pub r: BigUint,
    /// s scalar (low-S)
    pub s: BigUint,
    /// Recovery id (0 or 1)
    pub v: u8,
}

impl Signature {
    /// `r || s` as 64 big-endian bytes
    pub fn to_bytes(&self) -> Result<[u8; 64]> {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&to_be_bytes32(&self.r)?);
        out[32..].copy_from_slice(&to_be_bytes32(&self.s)?);
        Ok(out)
    }

    fn to_ecdsa(&self) -> Result<EcdsaSignature> {
        EcdsaSignature::from_scalars(to_be_bytes32(&self.r)?, to_be_bytes32(&self.s)?)
            .map_err(|_| WitnessError::Signing {
                reason: "signature scalars out of range".into(),
            })
    }
}

/// Output of [`sign`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    /// Signature over `msg_hash`
    pub signature: Signature,
    /// Signer's public key
    pub public_key: PublicKeyCoords,
    /// Normalized message hash
    pub msg_hash: [u8; WORD_BYTES],
}

fn check_scalar(name: &str, value: &BigUint, order: &BigUint) -> Result<()> {
    if value.is_zero() || value >= order {
        return Err(WitnessError::Signing {
            reason: format!("{name} outside (0, n)"),
        });
    }
    Ok(())
}

/// Sign `msg_hash` with `key`
#[instrument(skip_all)]
pub fn sign(msg_hash: &MessageHash, key: &SigningKey) -> Result<SignedMessage> {
    let digest = msg_hash.normalize()?;
    let (signature, recovery_id) = key.sign_prehash_recoverable(&digest)?;
    let (r_bytes, s_bytes) = signature.split_bytes();

    let r = BigUint::from_bytes_be(&r_bytes);
    let s = BigUint::from_bytes_be(&s_bytes);
    let order = curve_order();
    check_scalar("r", &r, &order)?;
    check_scalar("s", &s, &order)?;
    debug!(v = recovery_id.to_byte(), "Message hash signed");

    Ok(SignedMessage {
        signature: Signature {
            r,
            s,
            v: recovery_id.to_byte(),
        },
        public_key: PublicKeyCoords::from_verifying_key(key.verifying_key()),
        msg_hash: digest,
    })
}

/// Recover the signer's public key from a signature
pub fn recover_public_key(
    msg_hash: &[u8; WORD_BYTES],
    signature: &Signature,
) -> Result<VerifyingKey> {
    let recovery_id = RecoveryId::from_byte(signature.v).ok_or_else(|| WitnessError::Signing {
        reason: format!("invalid recovery id {}", signature.v),
    })?;
    Ok(VerifyingKey::recover_from_prehash(
        msg_hash,
        &signature.to_ecdsa()?,
        recovery_id,
    )?)
}

/// Check a signature against a public key
pub fn verify(msg_hash: &[u8; WORD_BYTES], signature: &Signature, key: &VerifyingKey) -> bool {
    signature
        .to_ecdsa()
        .is_ok_and(|sig| key.verify_prehash(msg_hash, &sig).is_ok())
}
