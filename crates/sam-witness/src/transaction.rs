//! Message hash of a module transaction
//!
//! Members of a multi-signature account sign the Keccak-256 hash of the
//! ABI-encoded tuple
//! `(to, value, keccak256(data), operation, nonce, samAddress, chainId)`.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::account::{keccak256, Address, ADDRESS_LEN};
use crate::bigint::{to_be_bytes32, WORD_BYTES};
use crate::error::Result;
use crate::signer::MessageHash;

/// Call kind of a module transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Regular call
    #[default]
    Call,
    /// Delegate call
    DelegateCall,
}

impl Operation {
    fn code(self) -> u8 {
        match self {
            Self::Call => 0,
            Self::DelegateCall => 1,
        }
    }
}

/// Transaction whose hash the participants sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransaction {
    /// Call target
    pub to: Address,
    /// Wei attached to the call
    pub value: BigUint,
    /// Calldata
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    /// Call kind
    pub operation: Operation,
    /// Module nonce
    pub nonce: BigUint,
    /// Address of the module verifying the proof
    pub sam_address: Address,
    /// Chain id
    pub chain_id: BigUint,
}

fn address_word(address: &Address) -> [u8; WORD_BYTES] {
    let mut word = [0u8; WORD_BYTES];
    word[WORD_BYTES - ADDRESS_LEN..].copy_from_slice(address.as_bytes());
    word
}

impl SafeTransaction {
    /// ABI encoding of the signed tuple, seven 32-byte words
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut operation = [0u8; WORD_BYTES];
        operation[WORD_BYTES - 1] = self.operation.code();

        let words: [[u8; WORD_BYTES]; 7] = [
            address_word(&self.to),
            to_be_bytes32(&self.value)?,
            keccak256(&self.data),
            operation,
            to_be_bytes32(&self.nonce)?,
            address_word(&self.sam_address),
            to_be_bytes32(&self.chain_id)?,
        ];
        Ok(words.concat())
    }

    /// Keccak-256 of [`SafeTransaction::encode`]
    pub fn message_hash(&self) -> Result<MessageHash> {
        Ok(MessageHash::from(keccak256(&self.encode()?)))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}
