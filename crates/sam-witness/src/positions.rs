//! Bit-packing of Merkle path directions

use serde::{Deserialize, Serialize};

use crate::error::{Result, WitnessError};

/// Longest direction sequence that fits the packed representation
pub const MAX_PACKED_BITS: usize = 64;

/// Which end of the packed integer the first direction bit lands on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// First bit is the least-significant bit; the packed value equals the
    /// leaf position for leaf-to-root path indices.
    LsbFirst,
    /// First bit is the most-significant of `len` bits.
    #[default]
    MsbFirst,
}

impl BitOrder {
    fn shift(self, index: usize, len: usize) -> usize {
        match self {
            Self::LsbFirst => index,
            Self::MsbFirst => len - 1 - index,
        }
    }
}

fn check_len(len: usize) -> Result<()> {
    if len > MAX_PACKED_BITS {
        return Err(WitnessError::InvalidInput {
            field: "path length".into(),
            value: len.to_string(),
            expected: format!("at most {MAX_PACKED_BITS} bits"),
        });
    }
    Ok(())
}

/// Pack a 0/1 sequence into one integer
pub fn compress(bits: &[u8], order: BitOrder) -> Result<u64> {
    check_len(bits.len())?;

    let mut packed = 0u64;
    for (index, &bit) in bits.iter().enumerate() {
        if bit > 1 {
            return Err(WitnessError::InvalidBit { index, value: bit });
        }
        packed |= u64::from(bit) << order.shift(index, bits.len());
    }
    Ok(packed)
}

/// Unpack `len` bits from `packed`; inverse of [`compress`]
///
/// Set bits at or above `len` are rejected.
pub fn decompress(packed: u64, len: usize, order: BitOrder) -> Result<Vec<u8>> {
    check_len(len)?;
    if len < MAX_PACKED_BITS && packed >> len != 0 {
        return Err(WitnessError::InvalidInput {
            field: "packed path".into(),
            value: packed.to_string(),
            expected: format!("value below 2^{len}"),
        });
    }

    Ok((0..len)
        .map(|index| ((packed >> order.shift(index, len)) & 1) as u8)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_orders() {
        let bits = [1, 0, 1, 0, 0];
        assert_eq!(compress(&bits, BitOrder::LsbFirst).unwrap(), 0b00101);
        assert_eq!(compress(&bits, BitOrder::MsbFirst).unwrap(), 0b10100);
    }

    #[test]
    fn test_default_puts_first_bit_on_top() {
        // bit i lands at position len - 1 - i
        let bits = [1u8, 0, 1, 0, 0];
        let expected = bits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (bits.len() - 1 - i)));
        assert_eq!(BitOrder::default(), BitOrder::MsbFirst);
        assert_eq!(compress(&bits, BitOrder::default()).unwrap(), expected);
        assert_eq!(expected, 20);
    }

    #[test]
    fn test_non_binary_rejected() {
        let err = compress(&[0, 1, 2], BitOrder::LsbFirst).unwrap_err();
        assert!(matches!(err, WitnessError::InvalidBit { index: 2, value: 2 }));
    }

    #[test]
    fn test_empty_and_full_width() {
        assert_eq!(compress(&[], BitOrder::MsbFirst).unwrap(), 0);
        assert!(decompress(0, 0, BitOrder::LsbFirst).unwrap().is_empty());

        let ones = vec![1u8; MAX_PACKED_BITS];
        assert_eq!(compress(&ones, BitOrder::LsbFirst).unwrap(), u64::MAX);
        assert_eq!(decompress(u64::MAX, MAX_PACKED_BITS, BitOrder::MsbFirst).unwrap(), ones);
        assert!(compress(&[0u8; MAX_PACKED_BITS + 1], BitOrder::LsbFirst).is_err());
    }

    #[test]
    fn test_decompress_rejects_stray_bits() {
        assert!(decompress(0b100, 2, BitOrder::LsbFirst).is_err());
    }

    proptest! {
        #[test]
        fn compress_round_trips(bits in prop::collection::vec(0u8..=1, 0..=MAX_PACKED_BITS), msb in any::<bool>()) {
            let order = if msb { BitOrder::MsbFirst } else { BitOrder::LsbFirst };
            let packed = compress(&bits, order).unwrap();
            prop_assert_eq!(decompress(packed, bits.len(), order).unwrap(), bits);
        }
    }
}
