//! # SAM Witness
//!
//! Witness assembly for circuits proving "a registered participant signed
//! this message hash": secp256k1 ECDSA over the hash, plus membership of the
//! signer's address in a fixed-height MiMC Merkle tree.
//!
//! ## Pipeline
//!
//! - **Account**: validate the key pair and derive the signer's address
//! - **Membership**: require the address exactly once in the participant list
//! - **Tree**: build the tree over the ordered list and take the inclusion proof
//! - **Signature**: deterministic (RFC 6979) signature over the message hash
//! - **Encoding**: register-chunked (arithmetic) or byte-array output schema
//!
//! ## Example
//!
//! ```rust,ignore
//! use sam_witness::{WitnessAssembler, WitnessConfig, WitnessRequest};
//!
//! let assembler = WitnessAssembler::new(WitnessConfig::with_height(5))?;
//!
//! let request = WitnessRequest::new(
//!     private_key,
//!     participants,
//!     "0x104ffbad9450b48089e3d917b63fc13c88ddac7ed4a02bc03512d883f0666c8b",
//! );
//!
//! let witness = assembler.arithmetic(&request)?;
//! std::fs::write("input.json", witness.to_json()?)?;
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod account;
pub mod bigint;
pub mod circuits;
pub mod error;
pub mod merkle;
pub mod mimc;
pub mod positions;
pub mod schema;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod witness;

// Re-exports
pub use account::{normalize_address, Account, Address, PublicKeyCoords};
pub use bigint::ChunkParams;
pub use error::{Result, WitnessError};
pub use merkle::{InclusionProof, MembershipTree};
pub use mimc::{MimcHasher, MimcSponge};
pub use positions::BitOrder;
pub use schema::{ArithmeticWitness, ByteWitness, PublicKeyBytes, Witness};
pub use signer::{MessageHash, Signature, SignedMessage};
pub use transaction::SafeTransaction;
pub use types::{TreeConfig, WitnessConfig, WitnessRequest};
pub use witness::{CanonicalWitness, Target, WitnessAssembler};
