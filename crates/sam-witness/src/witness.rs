//! Witness assembly pipeline
//!
//! One canonical pipeline (key validation, membership check, tree, proof,
//! signature) feeds two independent serializers. Any failure aborts the
//! request before a witness exists.

use std::time::Instant;

use ark_bn254::Fr;
use tracing::{debug, error, info, instrument};

use crate::account::{Account, Address};
use crate::error::{Result, WitnessError};
use crate::merkle::{InclusionProof, MembershipTree};
use crate::mimc::{fr_to_string, MimcHasher};
use crate::schema::{ArithmeticWitness, ByteWitness, Witness};
use crate::signer::{sign, SignedMessage};
use crate::types::{WitnessConfig, WitnessRequest};

/// Output schema identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// k-register big-integer witness
    Arithmetic,
    /// Byte-array witness with packed path index
    Bytes,
}

impl Target {
    /// Schema name
    pub fn name(&self) -> &str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Bytes => "bytes",
        }
    }
}

/// Schema-independent result of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalWitness {
    /// Signer's derived address
    pub address: Address,
    /// Inclusion proof for the signer's leaf
    pub proof: InclusionProof,
    /// Signature and signer public key
    pub signed: SignedMessage,
}

/// Builds witnesses from requests under a fixed configuration
#[derive(Debug, Clone)]
pub struct WitnessAssembler {
    config: WitnessConfig,
    hasher: MimcHasher,
    empty_leaf: Fr,
}

impl WitnessAssembler {
    /// Validate `config` and bind the shared hash table
    pub fn new(config: WitnessConfig) -> Result<Self> {
        config.validate()?;
        let hasher = MimcHasher::new(config.tree.hash_key_fr()?);
        let empty_leaf = config.tree.empty_leaf_fr()?;

        Ok(Self {
            config,
            hasher,
            empty_leaf,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &WitnessConfig {
        &self.config
    }

    /// Hasher used for every tree
    pub fn hasher(&self) -> &MimcHasher {
        &self.hasher
    }

    /// Build the membership tree over `participants` in the given order
    pub fn build_tree(&self, participants: &[Address]) -> Result<MembershipTree> {
        let values: Vec<Fr> = participants.iter().map(Address::to_field).collect();
        MembershipTree::build(
            self.config.tree.height,
            &values,
            self.empty_leaf,
            self.hasher.clone(),
        )
    }

    fn account(request: &WitnessRequest) -> Result<Account> {
        match &request.public_key {
            Some(public_key) => Account::from_key_pair(&request.private_key, public_key),
            None => Account::from_private_key(&request.private_key),
        }
    }

    fn check_membership(address: Address, participants: &[Address]) -> Result<()> {
        match participants.iter().filter(|p| **p == address).count() {
            1 => Ok(()),
            0 => Err(WitnessError::Membership {
                address: address.to_checksum(),
                reason: "not in participant list".into(),
            }),
            n => Err(WitnessError::Membership {
                address: address.to_checksum(),
                reason: format!("listed {n} times"),
            }),
        }
    }

    /// Run the shared pipeline up to the schema-independent result
    #[instrument(skip(self, request), fields(participants = request.participants.len()))]
    pub fn canonical(&self, request: &WitnessRequest) -> Result<CanonicalWitness> {
        let start = Instant::now();

        let account = Self::account(request)?;
        let address = account.address();
        let participants = request.participant_addresses()?;
        Self::check_membership(address, &participants)?;
        debug!(%address, "Signer is a participant");

        let tree = self.build_tree(&participants)?;
        let proof = tree.proof(address.to_field()).map_err(|e| {
            error!(%address, "Member missing from its own tree: {}", e);
            e
        })?;
        let tree_time = start.elapsed();

        let signed = sign(&request.msg_hash, account.signing_key())?;

        debug!(
            "Canonical witness ready - tree: {:?}, total: {:?}",
            tree_time,
            start.elapsed()
        );

        Ok(CanonicalWitness {
            address,
            proof,
            signed,
        })
    }

    /// Assemble a register-encoded witness
    #[instrument(skip(self, request))]
    pub fn arithmetic(&self, request: &WitnessRequest) -> Result<ArithmeticWitness> {
        let canonical = self.canonical(request)?;
        let witness = ArithmeticWitness::from_canonical(&canonical, self.config.chunks)?;
        info!(
            "Arithmetic witness assembled for {}, root {}",
            canonical.address, witness.root
        );
        Ok(witness)
    }

    /// Assemble a byte-encoded witness
    #[instrument(skip(self, request))]
    pub fn byte_target(&self, request: &WitnessRequest) -> Result<ByteWitness> {
        let canonical = self.canonical(request)?;
        let witness = ByteWitness::from_canonical(&canonical, self.config.bit_order)?;
        info!(
            "Byte witness assembled for {}, root {}",
            canonical.address, witness.root
        );
        Ok(witness)
    }

    /// Assemble a witness for `target`
    pub fn assemble(&self, request: &WitnessRequest, target: Target) -> Result<Witness> {
        match target {
            Target::Arithmetic => self.arithmetic(request).map(Witness::Arithmetic),
            Target::Bytes => self.byte_target(request).map(Witness::Bytes),
        }
    }

    /// Assemble independent requests, each succeeding or failing on its own
    #[instrument(skip(self, requests), fields(target = %target.name(), count = requests.len()))]
    pub fn assemble_batch(
        &self,
        requests: &[WitnessRequest],
        target: Target,
    ) -> Vec<Result<Witness>> {
        let start = Instant::now();

        #[cfg(feature = "parallel")]
        let results: Vec<_> = {
            use rayon::prelude::*;
            requests
                .par_iter()
                .map(|request| self.assemble(request, target))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = requests
            .iter()
            .map(|request| self.assemble(request, target))
            .collect();

        info!(
            "Batch of {} assembled in {:?}, {} failed",
            requests.len(),
            start.elapsed(),
            results.iter().filter(|r| r.is_err()).count()
        );
        results
    }
}

/// Convenience function to assemble a register-encoded witness
pub fn generate_arithmetic_witness(
    private_key: &[u8],
    participants: &[String],
    msg_hash: &str,
    tree_height: usize,
) -> Result<ArithmeticWitness> {
    let assembler = WitnessAssembler::new(WitnessConfig::with_height(tree_height))?;
    assembler.arithmetic(&WitnessRequest::new(
        private_key,
        participants.to_vec(),
        msg_hash,
    ))
}

/// Convenience function to assemble a byte-encoded witness
pub fn generate_byte_witness(
    private_key: &[u8],
    participants: &[String],
    msg_hash: &str,
    tree_height: usize,
) -> Result<ByteWitness> {
    let assembler = WitnessAssembler::new(WitnessConfig::with_height(tree_height))?;
    assembler.byte_target(&WitnessRequest::new(
        private_key,
        participants.to_vec(),
        msg_hash,
    ))
}

/// Root of the tree a request would build, for cross-checking
pub fn participant_root(participants: &[Address], config: &WitnessConfig) -> Result<String> {
    let assembler = WitnessAssembler::new(config.clone())?;
    Ok(fr_to_string(&assembler.build_tree(participants)?.root()))
}
