//! MiMC sponge hash compatible with circomlib
//!
//! The round-constant table is derived from a Keccak-256 chain, which is the
//! expensive part. It is built once per process on first use and shared
//! read-only through an [`Arc`].

use std::sync::{Arc, OnceLock};

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;
use sha3::{Digest, Keccak256};

use crate::error::{Result, WitnessError};

/// Feistel rounds per permutation
pub const MIMC_ROUNDS: usize = 220;

const SEED: &[u8] = b"mimcsponge";

static SHARED: OnceLock<Arc<MimcSponge>> = OnceLock::new();

/// Round-constant table for the MiMC Feistel permutation
#[derive(Debug)]
pub struct MimcSponge {
    constants: Box<[Fr]>,
}

impl MimcSponge {
    /// Derive the round constants
    ///
    /// Prefer [`MimcSponge::shared`]; this recomputes the whole table.
    pub fn build() -> Self {
        let mut constants = vec![Fr::from(0u64); MIMC_ROUNDS];
        let mut digest = Keccak256::digest(SEED);
        for constant in constants.iter_mut().take(MIMC_ROUNDS - 1).skip(1) {
            digest = Keccak256::digest(digest);
            *constant = Fr::from_be_bytes_mod_order(&digest);
        }
        Self {
            constants: constants.into_boxed_slice(),
        }
    }

    /// Process-wide table, built on first call
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| {
            tracing::debug!("Deriving MiMC sponge round constants");
            Arc::new(Self::build())
        }))
    }

    /// Round constants, first and last are zero
    pub fn constants(&self) -> &[Fr] {
        &self.constants
    }

    /// One MiMC-Feistel permutation of `(xl, xr)` under `key`
    pub fn permute(&self, mut xl: Fr, mut xr: Fr, key: Fr) -> (Fr, Fr) {
        let last = self.constants.len() - 1;
        for (round, constant) in self.constants.iter().enumerate() {
            let t = xl + key + constant;
            let t5 = t.square().square() * t;
            if round < last {
                let next = xr + t5;
                xr = xl;
                xl = next;
            } else {
                xr += t5;
            }
        }
        (xl, xr)
    }

    /// Absorb `inputs` into the sponge and squeeze one element
    pub fn multi_hash(&self, inputs: &[Fr], key: Fr) -> Fr {
        let mut r = Fr::from(0u64);
        let mut c = Fr::from(0u64);
        for input in inputs {
            r += input;
            (r, c) = self.permute(r, c, key);
        }
        r
    }
}

/// MiMC sponge bound to a fixed key
#[derive(Debug, Clone)]
pub struct MimcHasher {
    sponge: Arc<MimcSponge>,
    key: Fr,
}

impl Default for MimcHasher {
    fn default() -> Self {
        Self::new(Fr::from(0u64))
    }
}

impl MimcHasher {
    /// Create a hasher over the shared constant table
    pub fn new(key: Fr) -> Self {
        Self {
            sponge: MimcSponge::shared(),
            key,
        }
    }

    /// Sponge key
    pub fn key(&self) -> Fr {
        self.key
    }

    /// Hash one value (leaf hash)
    pub fn hash_one(&self, value: Fr) -> Fr {
        self.sponge.multi_hash(&[value], self.key)
    }

    /// Hash an ordered pair (internal node hash)
    pub fn hash_pair(&self, left: Fr, right: Fr) -> Fr {
        self.sponge.multi_hash(&[left, right], self.key)
    }

    /// Hash an arbitrary sequence
    pub fn hash(&self, inputs: &[Fr]) -> Fr {
        self.sponge.multi_hash(inputs, self.key)
    }
}

/// Field modulus as an unsigned integer
pub fn field_modulus() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}

/// Lift an integer into the field, rejecting values that would wrap
pub fn biguint_to_fr(value: &BigUint) -> Result<Fr> {
    if value >= &field_modulus() {
        return Err(WitnessError::InvalidInput {
            field: "field element".into(),
            value: value.to_string(),
            expected: "value below the BN254 scalar modulus".into(),
        });
    }
    Ok(Fr::from_be_bytes_mod_order(&value.to_bytes_be()))
}

/// Canonical integer representative of a field element
pub fn fr_to_biguint(f: &Fr) -> BigUint {
    BigUint::from_bytes_be(&f.into_bigint().to_bytes_be())
}

/// Convert a decimal string to Fr
pub fn string_to_fr(s: &str) -> Result<Fr> {
    let value = BigUint::from_str_radix(s, 10).map_err(|e| WitnessError::InvalidInput {
        field: "field element".into(),
        value: s.into(),
        expected: format!("decimal integer ({e})"),
    })?;
    biguint_to_fr(&value)
}

/// Convert Fr to decimal string
pub fn fr_to_string(f: &Fr) -> String {
    fr_to_biguint(f).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_fr(s: &str) -> Fr {
        biguint_to_fr(&BigUint::from_str_radix(s, 16).unwrap()).unwrap()
    }

    #[test]
    fn test_round_constants() {
        let sponge = MimcSponge::shared();
        let constants = sponge.constants();
        assert_eq!(constants.len(), MIMC_ROUNDS);
        assert_eq!(constants[0], Fr::from(0u64));
        assert_eq!(constants[MIMC_ROUNDS - 1], Fr::from(0u64));
        assert_eq!(
            fr_to_string(&constants[1]),
            "7120861356467848435263064379192047478074060781135320967663101236819528304084"
        );
    }

    #[test]
    fn test_permutation_reference() {
        let sponge = MimcSponge::shared();
        let (xl, xr) = sponge.permute(Fr::from(1u64), Fr::from(2u64), Fr::from(3u64));
        assert_eq!(
            xl,
            hex_fr("28c6f78ee3ed6b336280d3e522b03efc49eeb5a2a3af1075ccf6f64e5d867e53")
        );
        assert_eq!(
            xr,
            hex_fr("05d9ff7555e18007f7809e5977e6dd41ff93ca7c8d11249d51eaeb0b4f727d37")
        );
    }

    #[test]
    fn test_multi_hash_reference() {
        let hasher = MimcHasher::default();
        assert_eq!(
            hasher.hash_pair(Fr::from(1u64), Fr::from(2u64)),
            hex_fr("2bcea035a1251603f1ceaf73cd4ae89427c47075bb8e3a944039ff1e3d6d2a6f")
        );
        assert_eq!(
            fr_to_string(&hasher.hash_one(Fr::from(1u64))),
            "8792246410719720074073794355580855662772292438409936688983564419486782556587"
        );
    }

    #[test]
    fn test_table_is_shared() {
        let a = MimcSponge::shared();
        let b = MimcSponge::shared();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.constants(), MimcSponge::build().constants());
    }

    #[test]
    fn test_key_changes_output() {
        let plain = MimcHasher::default();
        let keyed = MimcHasher::new(Fr::from(7u64));
        let x = Fr::from(42u64);
        assert_ne!(plain.hash_one(x), keyed.hash_one(x));
        assert_eq!(plain.hash_one(x), MimcHasher::default().hash_one(x));
    }

    #[test]
    fn test_string_conversions() {
        let f = string_to_fr("123456789").unwrap();
        assert_eq!(f, Fr::from(123_456_789u64));
        assert_eq!(fr_to_string(&f), "123456789");
        assert_eq!(fr_to_string(&Fr::from(0u64)), "0");

        let modulus = field_modulus().to_string();
        assert!(string_to_fr(&modulus).is_err());
        assert!(string_to_fr("12ab").is_err());
    }
}
