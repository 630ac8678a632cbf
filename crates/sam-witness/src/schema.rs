//! Witness shapes handed to the proving back-ends
//!
//! Both shapes are pure functions of a [`CanonicalWitness`]. Field elements
//! are rendered as decimal strings.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::bigint::{
    from_be_bytes, to_be_bytes32, to_chunks_bitwise, to_decimal_strings, ChunkParams,
};
use crate::error::Result;
use crate::mimc::fr_to_string;
use crate::positions::{compress, BitOrder};
use crate::witness::CanonicalWitness;

/// Witness for circuits over k-register big-integer arithmetic (circom style)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticWitness {
    /// Tree root
    pub root: String,
    /// Sibling hashes, leaf level first
    pub path_elements: Vec<String>,
    /// One direction bit per level
    pub path_indices: Vec<u8>,
    /// Message hash registers
    pub message_hash: Vec<String>,
    /// `[x registers, y registers]`
    pub public_key: [Vec<String>; 2],
    /// Signature r registers
    pub r: Vec<String>,
    /// Signature s registers
    pub s: Vec<String>,
}

impl ArithmeticWitness {
    /// Encode a canonical witness with the given register layout
    pub fn from_canonical(canonical: &CanonicalWitness, params: ChunkParams) -> Result<Self> {
        let chunk = |value: &BigUint| -> Result<Vec<String>> {
            Ok(to_decimal_strings(&to_chunks_bitwise(value, params)?))
        };
        let signed = &canonical.signed;

        Ok(Self {
            root: fr_to_string(&canonical.proof.root),
            path_elements: canonical.proof.path_elements.iter().map(fr_to_string).collect(),
            path_indices: canonical.proof.path_indices.clone(),
            message_hash: chunk(&from_be_bytes(&signed.msg_hash))?,
            public_key: [chunk(&signed.public_key.x)?, chunk(&signed.public_key.y)?],
            r: chunk(&signed.signature.r)?,
            s: chunk(&signed.signature.s)?,
        })
    }

    /// Render as a circom `input.json` document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Public key coordinates as big-endian bytes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyBytes {
    /// X coordinate
    pub x: [u8; 32],
    /// Y coordinate
    pub y: [u8; 32],
}

/// Witness for circuits over byte arrays (Noir style)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteWitness {
    /// Tree root
    pub root: String,
    /// Sibling hashes, leaf level first
    pub hash_path: Vec<String>,
    /// Direction bits packed into one integer
    pub packed_path_index: u64,
    /// Message hash bytes
    pub message_hash_bytes: [u8; 32],
    /// `r || s`, 64 bytes
    pub signature_bytes: Vec<u8>,
    /// Public key bytes
    pub public_key_bytes: PublicKeyBytes,
}

impl ByteWitness {
    /// Encode a canonical witness, packing directions in `order`
    pub fn from_canonical(canonical: &CanonicalWitness, order: BitOrder) -> Result<Self> {
        let signed = &canonical.signed;

        Ok(Self {
            root: fr_to_string(&canonical.proof.root),
            hash_path: canonical.proof.path_elements.iter().map(fr_to_string).collect(),
            packed_path_index: compress(&canonical.proof.path_indices, order)?,
            message_hash_bytes: signed.msg_hash,
            signature_bytes: signed.signature.to_bytes()?.to_vec(),
            public_key_bytes: PublicKeyBytes {
                x: to_be_bytes32(&signed.public_key.x)?,
                y: to_be_bytes32(&signed.public_key.y)?,
            },
        })
    }

    /// Render as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a Noir `Prover.toml` document
    pub fn to_prover_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Either witness shape
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Witness {
    /// Register-encoded witness
    Arithmetic(ArithmeticWitness),
    /// Byte-encoded witness
    Bytes(ByteWitness),
}

impl Witness {
    /// Render as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
