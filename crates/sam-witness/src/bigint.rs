//! Fixed-width big integer encodings
//!
//! Circuits without native 256-bit arithmetic take integers as `k` registers
//! of `n` bits each, least-significant register first. Byte-oriented back-ends
//! take 32 big-endian bytes instead. Every encoder here range-checks its input
//! and refuses to truncate.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WitnessError};

/// Width of one field word in bits
pub const WORD_BITS: u32 = 256;

/// Width of one field word in bytes
pub const WORD_BYTES: usize = 32;

/// Register layout for arithmetic-target encodings
///
/// `n` bits per register, `k` registers, with `n * k == 256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChunkParams")]
pub struct ChunkParams {
    n: u32,
    k: u32,
}

#[derive(Deserialize)]
struct RawChunkParams {
    n: u32,
    k: u32,
}

impl TryFrom<RawChunkParams> for ChunkParams {
    type Error = WitnessError;

    fn try_from(raw: RawChunkParams) -> Result<Self> {
        Self::new(raw.n, raw.k)
    }
}

impl Default for ChunkParams {
    /// Four 64-bit registers
    fn default() -> Self {
        Self { n: 64, k: 4 }
    }
}

impl ChunkParams {
    /// Validate and build a register layout
    pub fn new(n: u32, k: u32) -> Result<Self> {
        if n == 0 || k == 0 || n.checked_mul(k) != Some(WORD_BITS) {
            return Err(WitnessError::InvalidChunkParams { n, k });
        }
        Ok(Self { n, k })
    }

    /// Bits per register
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Number of registers
    pub fn k(&self) -> u32 {
        self.k
    }
}

fn ensure_fits(value: &BigUint, width: u64) -> Result<()> {
    let bits = value.bits();
    if bits > width {
        return Err(WitnessError::ChunkingRange { bits, width });
    }
    Ok(())
}

/// Split `value` into registers using division and remainder.
pub fn to_chunks(value: &BigUint, params: ChunkParams) -> Result<Vec<BigUint>> {
    ensure_fits(value, u64::from(params.n) * u64::from(params.k))?;

    let modulus = BigUint::one() << params.n;
    let mut rest = value.clone();
    let mut chunks = Vec::with_capacity(params.k as usize);
    for _ in 0..params.k {
        chunks.push(&rest % &modulus);
        rest /= &modulus;
    }
    Ok(chunks)
}

/// Split `value` into registers using a mask and right shifts.
///
/// Agrees with [`to_chunks`] on every input, including the rejections.
pub fn to_chunks_bitwise(value: &BigUint, params: ChunkParams) -> Result<Vec<BigUint>> {
    ensure_fits(value, u64::from(params.n) * u64::from(params.k))?;

    let mask = (BigUint::one() << params.n) - 1u32;
    let mut rest = value.clone();
    let mut chunks = Vec::with_capacity(params.k as usize);
    for _ in 0..params.k {
        chunks.push(&rest & &mask);
        rest >>= params.n;
    }
    Ok(chunks)
}

/// Reassemble registers produced by [`to_chunks`].
///
/// Fails unless there are exactly `k` registers of at most `n` bits each.
pub fn from_chunks(chunks: &[BigUint], params: ChunkParams) -> Result<BigUint> {
    if chunks.len() != params.k as usize {
        return Err(WitnessError::InvalidInput {
            field: "chunks".into(),
            value: chunks.len().to_string(),
            expected: format!("{} registers", params.k),
        });
    }

    let mut value = BigUint::zero();
    for chunk in chunks.iter().rev() {
        ensure_fits(chunk, u64::from(params.n))?;
        value = (value << params.n) | chunk;
    }
    Ok(value)
}

/// Encode as 32 big-endian bytes using division by 256.
pub fn to_be_bytes32(value: &BigUint) -> Result<[u8; WORD_BYTES]> {
    ensure_fits(value, u64::from(WORD_BITS))?;

    let base = BigUint::from(256u32);
    let mut rest = value.clone();
    let mut out = [0u8; WORD_BYTES];
    for byte in out.iter_mut().rev() {
        let digit = &rest % &base;
        *byte = digit.to_u8().unwrap_or(0);
        rest /= &base;
    }
    Ok(out)
}

/// Encode as 32 big-endian bytes using a byte mask and shifts.
pub fn to_be_bytes32_bitwise(value: &BigUint) -> Result<[u8; WORD_BYTES]> {
    ensure_fits(value, u64::from(WORD_BITS))?;

    let mask = BigUint::from(0xffu32);
    let mut rest = value.clone();
    let mut out = [0u8; WORD_BYTES];
    for byte in out.iter_mut().rev() {
        if rest.is_zero() {
            break;
        }
        let low = &rest & &mask;
        *byte = low.to_u8().unwrap_or(0);
        rest >>= 8u32;
    }
    Ok(out)
}

/// Decode big-endian bytes by repeated multiply-and-add.
pub fn from_be_bytes(bytes: &[u8]) -> BigUint {
    bytes.iter().fold(BigUint::zero(), |acc, &b| acc * 256u32 + b)
}

/// Decode big-endian bytes by shift-and-or.
pub fn from_be_bytes_bitwise(bytes: &[u8]) -> BigUint {
    bytes
        .iter()
        .fold(BigUint::zero(), |acc, &b| (acc << 8u32) | BigUint::from(b))
}

/// Render integers as decimal strings
pub fn to_decimal_strings(values: &[BigUint]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
