//! Configuration and request types for witness assembly

use std::fmt;

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::account::Address;
use crate::bigint::ChunkParams;
use crate::error::{Result, WitnessError};
use crate::merkle::MAX_TREE_HEIGHT;
use crate::mimc::string_to_fr;
use crate::positions::BitOrder;
use crate::signer::MessageHash;

/// Default membership tree height
pub const DEFAULT_TREE_HEIGHT: usize = 5;

/// Membership tree parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Number of levels between leaves and root (1-32)
    pub height: usize,
    /// Sentinel for unused leaf slots, decimal field element
    pub empty_leaf: String,
    /// MiMC sponge key, decimal field element
    pub hash_key: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_TREE_HEIGHT,
            empty_leaf: "0".into(),
            hash_key: "0".into(),
        }
    }
}

impl TreeConfig {
    /// Validate parameter values
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.height > MAX_TREE_HEIGHT {
            return Err(WitnessError::InvalidConfig {
                reason: format!("tree height {} outside 1-{MAX_TREE_HEIGHT}", self.height),
            });
        }
        self.empty_leaf_fr()?;
        self.hash_key_fr()?;
        Ok(())
    }

    /// Empty-leaf sentinel as a field element
    pub fn empty_leaf_fr(&self) -> Result<Fr> {
        string_to_fr(&self.empty_leaf).map_err(|e| WitnessError::InvalidConfig {
            reason: format!("empty_leaf: {e}"),
        })
    }

    /// Sponge key as a field element
    pub fn hash_key_fr(&self) -> Result<Fr> {
        string_to_fr(&self.hash_key).map_err(|e| WitnessError::InvalidConfig {
            reason: format!("hash_key: {e}"),
        })
    }
}

/// Everything the assembler needs besides the per-request inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WitnessConfig {
    /// Membership tree parameters
    pub tree: TreeConfig,
    /// Register layout for the arithmetic target
    pub chunks: ChunkParams,
    /// Direction-bit packing for the byte target
    pub bit_order: BitOrder,
}

impl WitnessConfig {
    /// Default configuration at a given tree height
    pub fn with_height(height: usize) -> Self {
        Self {
            tree: TreeConfig {
                height,
                ..TreeConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate parameter values
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Per-request inputs
///
/// A witness is a pure function of these plus the [`WitnessConfig`].
#[derive(Clone)]
pub struct WitnessRequest {
    /// 32-byte secp256k1 private key
    pub private_key: Vec<u8>,
    /// Public key claimed for `private_key`, checked when present
    pub public_key: Option<Vec<u8>>,
    /// Ordered participant addresses; order fixes leaf positions
    pub participants: Vec<String>,
    /// Hash to sign
    pub msg_hash: MessageHash,
}

impl WitnessRequest {
    /// Request without a claimed public key
    pub fn new(
        private_key: impl Into<Vec<u8>>,
        participants: Vec<String>,
        msg_hash: impl Into<MessageHash>,
    ) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: None,
            participants,
            msg_hash: msg_hash.into(),
        }
    }

    /// Attach the public key to be checked against the private key
    #[must_use]
    pub fn with_public_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Parse every participant entry
    pub fn participant_addresses(&self) -> Result<Vec<Address>> {
        self.participants.iter().map(|p| Address::parse(p)).collect()
    }
}

impl fmt::Debug for WitnessRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WitnessRequest")
            .field("public_key", &self.public_key.as_ref().map(hex::encode))
            .field("participants", &self.participants.len())
            .field("msg_hash", &self.msg_hash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WitnessConfig::default();
        assert_eq!(config.tree.height, 5);
        assert_eq!(config.chunks, ChunkParams::default());
        assert_eq!(config.bit_order, BitOrder::MsbFirst);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_height_bounds() {
        assert!(WitnessConfig::with_height(0).validate().is_err());
        assert!(WitnessConfig::with_height(32).validate().is_ok());
        assert!(WitnessConfig::with_height(33).validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let config = WitnessConfig::from_json(
            r#"{"tree": {"height": 8}, "chunks": {"n": 32, "k": 8}, "bit_order": "lsb_first"}"#,
        )
        .unwrap();
        assert_eq!(config.tree.height, 8);
        assert_eq!(config.tree.empty_leaf, "0");
        assert_eq!(config.chunks.n(), 32);
        assert_eq!(config.bit_order, BitOrder::LsbFirst);

        assert!(WitnessConfig::from_json(r#"{"chunks": {"n": 64, "k": 5}}"#).is_err());
        assert!(WitnessConfig::from_json(r#"{"tree": {"empty_leaf": "x"}}"#).is_err());
        assert!(WitnessConfig::from_json(r#"{"tree": {"heigth": 4}}"#).is_err());
    }

    #[test]
    fn test_request_debug_hides_key() {
        let request = WitnessRequest::new(vec![0xabu8; 32], vec![], "00");
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("abab"));
    }
}
