//! Native membership circuit
//!
//! Rust-native R1CS rendition of the membership half of the attestation
//! circuit: it recomputes the MiMC leaf and root from a witness path and
//! enforces equality with the public root. Used to check witnesses without
//! an external prover.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError,
};

use crate::account::Address;
use crate::error::{Result, WitnessError};
use crate::mimc::{string_to_fr, MimcHasher, MimcSponge};
use crate::schema::ArithmeticWitness;

/// One MiMC-Feistel permutation over circuit variables
fn permute_var(
    mut xl: FpVar<Fr>,
    mut xr: FpVar<Fr>,
    key: &FpVar<Fr>,
    constants: &[Fr],
) -> std::result::Result<(FpVar<Fr>, FpVar<Fr>), SynthesisError> {
    let last = constants.len() - 1;
    for (round, constant) in constants.iter().enumerate() {
        let t = &xl + key + *constant;
        let t5 = t.square()?.square()? * &t;
        if round < last {
            let next = &xr + &t5;
            xr = xl;
            xl = next;
        } else {
            xr += &t5;
        }
    }
    Ok((xl, xr))
}

/// MiMC sponge over circuit variables, one output
fn multi_hash_var(
    inputs: &[FpVar<Fr>],
    key: &FpVar<Fr>,
    constants: &[Fr],
) -> std::result::Result<FpVar<Fr>, SynthesisError> {
    let mut r = FpVar::Constant(Fr::from(0u64));
    let mut c = FpVar::Constant(Fr::from(0u64));
    for input in inputs {
        r += input;
        (r, c) = permute_var(r, c, key, constants)?;
    }
    Ok(r)
}

/// Membership circuit
///
/// Proves: `root` is reached from `H(address)` along `path_elements` /
/// `path_indices`.
#[derive(Clone)]
pub struct MembershipCircuit {
    /// Public: tree root
    pub root: Fr,
    /// Private: signer address as a field element
    pub address: Fr,
    /// Private: sibling hashes, leaf level first
    pub path_elements: Vec<Fr>,
    /// Private: direction bits, leaf level first
    pub path_indices: Vec<bool>,
    /// Constant: MiMC key
    pub key: Fr,
}

impl MembershipCircuit {
    /// Read the membership inputs out of an arithmetic witness
    pub fn from_arithmetic(
        witness: &ArithmeticWitness,
        address: &Address,
        hasher: &MimcHasher,
    ) -> Result<Self> {
        let path_indices = witness
            .path_indices
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                0 => Ok(false),
                1 => Ok(true),
                value => Err(WitnessError::InvalidBit { index, value }),
            })
            .collect::<Result<Vec<_>>>()?;

        let circuit = Self {
            root: string_to_fr(&witness.root)?,
            address: address.to_field(),
            path_elements: witness
                .path_elements
                .iter()
                .map(|e| string_to_fr(e))
                .collect::<Result<Vec<_>>>()?,
            path_indices,
            key: hasher.key(),
        };
        circuit.check_path_lengths()?;
        Ok(circuit)
    }

    fn check_path_lengths(&self) -> Result<()> {
        if self.path_elements.len() != self.path_indices.len() {
            return Err(WitnessError::InvalidInput {
                field: "path_elements".into(),
                value: self.path_elements.len().to_string(),
                expected: format!("{} entries", self.path_indices.len()),
            });
        }
        Ok(())
    }

    /// Synthesize into a fresh constraint system and report satisfaction
    ///
    /// A path whose sibling and direction counts differ is rejected with
    /// [`WitnessError::InvalidInput`] before synthesis.
    pub fn is_satisfied(self) -> Result<bool> {
        self.check_path_lengths()?;
        let cs = ConstraintSystem::<Fr>::new_ref();
        self.generate_constraints(cs.clone())?;
        Ok(cs.is_satisfied()?)
    }
}

impl ConstraintSynthesizer<Fr> for MembershipCircuit {
    fn generate_constraints(
        self,
        cs: ConstraintSystemRef<Fr>,
    ) -> std::result::Result<(), SynthesisError> {
        if self.path_elements.len() != self.path_indices.len() {
            return Err(SynthesisError::Unsatisfiable);
        }
        let sponge = MimcSponge::shared();
        let constants = sponge.constants();

        // Allocate public inputs
        let root_var = FpVar::new_input(cs.clone(), || Ok(self.root))?;

        // Allocate private inputs (witnesses)
        let address_var = FpVar::new_witness(cs.clone(), || Ok(self.address))?;
        let key_var = FpVar::new_constant(cs.clone(), self.key)?;

        let mut node = multi_hash_var(&[address_var], &key_var, constants)?;
        for (sibling, is_right) in self.path_elements.iter().zip(&self.path_indices) {
            let sibling_var = FpVar::new_witness(cs.clone(), || Ok(*sibling))?;
            let bit = Boolean::new_witness(cs.clone(), || Ok(*is_right))?;

            let left = FpVar::conditionally_select(&bit, &sibling_var, &node)?;
            let right = FpVar::conditionally_select(&bit, &node, &sibling_var)?;
            node = multi_hash_var(&[left, right], &key_var, constants)?;
        }

        node.enforce_equal(&root_var)?;
        Ok(())
    }
}
