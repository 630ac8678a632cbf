//! Error types for witness assembly

use thiserror::Error;

/// Result type alias for witness operations
pub type Result<T> = std::result::Result<T, WitnessError>;

/// Errors that can occur while assembling a witness
///
/// Every variant aborts the whole assembly; no partial witness is returned.
#[derive(Error, Debug)]
pub enum WitnessError {
    /// Private or public key failed validation
    #[error("Invalid key: {reason}")]
    InvalidKey { reason: String },

    /// Message hash is neither a 32-byte hex string nor 32 raw bytes
    #[error("Invalid message hash: {reason}")]
    InvalidMsgHash { reason: String },

    /// Derived signer address is not exactly one member of the participant set
    #[error("Address {address} is not a member of the participant set: {reason}")]
    Membership { address: String, reason: String },

    /// Integer does not fit the requested register layout
    #[error("Value of {bits} bits does not fit in {width} bits")]
    ChunkingRange { bits: u64, width: u64 },

    /// Register layout does not cover exactly one 256-bit word
    #[error("Invalid chunk parameters n = {n}, k = {k} (n * k must be 256)")]
    InvalidChunkParams { n: u32, k: u32 },

    /// Leaf is absent from the padded leaf sequence
    #[error("Leaf {leaf} not found in tree")]
    NotFoundInTree { leaf: String },

    /// Path direction is not 0 or 1
    #[error("Invalid bit {value} at position {index}")]
    InvalidBit { index: usize, value: u8 },

    /// Participant entry is not a 20-byte hex address
    #[error("Invalid address {value}: {reason}")]
    InvalidAddress { value: String, reason: String },

    /// Configuration rejected by eager validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Invalid input value
    #[error("Invalid input: {field} = {value} (expected {expected})")]
    InvalidInput {
        field: String,
        value: String,
        expected: String,
    },

    /// Signing primitive failed or produced an out-of-range scalar
    #[error("Signing failed: {reason}")]
    Signing { reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML rendering error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Constraint system error
    #[error("Constraint error: {0}")]
    Constraint(String),
}

impl From<ark_relations::r1cs::SynthesisError> for WitnessError {
    fn from(e: ark_relations::r1cs::SynthesisError) -> Self {
        Self::Constraint(e.to_string())
    }
}

impl From<k256::ecdsa::Error> for WitnessError {
    fn from(e: k256::ecdsa::Error) -> Self {
        Self::Signing {
            reason: e.to_string(),
        }
    }
}
