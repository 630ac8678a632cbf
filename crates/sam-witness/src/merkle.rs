//! Fixed-height membership tree over MiMC
//!
//! Leaves are `H(value)`. Positions past the supplied leaves hold the raw
//! empty-leaf sentinel, so the tree always spans `2^height` slots. Only the
//! populated prefix of each level is materialized; the rest is read from the
//! precomputed empty-subtree roots.

use ark_bn254::Fr;
use tracing::{debug, instrument};

use crate::error::{Result, WitnessError};
use crate::mimc::{fr_to_string, MimcHasher};

/// Tallest tree the crate will build
pub const MAX_TREE_HEIGHT: usize = 32;

/// Inclusion proof from leaf to root
///
/// `path_indices[i]` is 0 when the running node is the left child at level
/// `i` and 1 when it is the right child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionProof {
    /// Sibling hashes, leaf level first
    pub path_elements: Vec<Fr>,
    /// Direction bits, leaf level first
    pub path_indices: Vec<u8>,
    /// Hashed leaf
    pub leaf: Fr,
    /// Root the path was taken from
    pub root: Fr,
    /// Leaf position in the padded sequence
    pub leaf_index: u64,
}

impl InclusionProof {
    /// Fold the path into a root
    pub fn compute_root(&self, hasher: &MimcHasher) -> Result<Fr> {
        if self.path_elements.len() != self.path_indices.len() {
            return Err(WitnessError::InvalidInput {
                field: "path_elements".into(),
                value: self.path_elements.len().to_string(),
                expected: format!("{} entries", self.path_indices.len()),
            });
        }

        let mut node = self.leaf;
        for (index, (sibling, &bit)) in self
            .path_elements
            .iter()
            .zip(&self.path_indices)
            .enumerate()
        {
            node = match bit {
                0 => hasher.hash_pair(node, *sibling),
                1 => hasher.hash_pair(*sibling, node),
                value => return Err(WitnessError::InvalidBit { index, value }),
            };
        }
        Ok(node)
    }

    /// Check the path against the recorded root
    pub fn verify(&self, hasher: &MimcHasher) -> bool {
        self.compute_root(hasher).is_ok_and(|root| root == self.root)
    }
}

/// Membership tree built from a complete, ordered leaf list
#[derive(Debug, Clone)]
pub struct MembershipTree {
    height: usize,
    hasher: MimcHasher,
    layers: Vec<Vec<Fr>>,
    zeros: Vec<Fr>,
}

impl MembershipTree {
    /// Hash `values` into leaves and build every level up to the root
    #[instrument(skip(values, empty_leaf, hasher), fields(leaves = values.len()))]
    pub fn build(
        height: usize,
        values: &[Fr],
        empty_leaf: Fr,
        hasher: MimcHasher,
    ) -> Result<Self> {
        if height > MAX_TREE_HEIGHT {
            return Err(WitnessError::InvalidInput {
                field: "height".into(),
                value: height.to_string(),
                expected: format!("at most {MAX_TREE_HEIGHT}"),
            });
        }
        let capacity = 1u64 << height;
        if values.len() as u64 > capacity {
            return Err(WitnessError::InvalidInput {
                field: "leaves".into(),
                value: values.len().to_string(),
                expected: format!("at most {capacity} for height {height}"),
            });
        }

        let mut zeros = Vec::with_capacity(height + 1);
        zeros.push(empty_leaf);
        for level in 0..height {
            zeros.push(hasher.hash_pair(zeros[level], zeros[level]));
        }

        let mut layers = Vec::with_capacity(height + 1);
        layers.push(values.iter().map(|v| hasher.hash_one(*v)).collect::<Vec<_>>());
        for level in 0..height {
            let next: Vec<Fr> = layers[level]
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).copied().unwrap_or(zeros[level]);
                    hasher.hash_pair(pair[0], right)
                })
                .collect();
            layers.push(next);
        }

        let tree = Self {
            height,
            hasher,
            layers,
            zeros,
        };
        debug!(root = %fr_to_string(&tree.root()), "Membership tree built");
        Ok(tree)
    }

    /// Tree height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Hasher the tree was built with
    pub fn hasher(&self) -> &MimcHasher {
        &self.hasher
    }

    /// Root hash
    pub fn root(&self) -> Fr {
        self.layers[self.height]
            .first()
            .copied()
            .unwrap_or(self.zeros[self.height])
    }

    /// Hashed leaves that were supplied, without padding
    pub fn leaves(&self) -> &[Fr] {
        &self.layers[0]
    }

    /// Root of an empty subtree at `level`
    pub fn zero(&self, level: usize) -> Option<Fr> {
        self.zeros.get(level).copied()
    }

    fn node(&self, level: usize, index: u64) -> Fr {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.layers[level].get(i))
            .copied()
            .unwrap_or(self.zeros[level])
    }

    /// Position of `H(value)` in the padded leaf sequence
    pub fn index_of(&self, value: Fr) -> Option<u64> {
        let leaf = self.hasher.hash_one(value);
        if let Some(i) = self.leaves().iter().position(|l| *l == leaf) {
            return Some(i as u64);
        }
        // first padding slot, if any padding exists
        let populated = self.leaves().len() as u64;
        (leaf == self.zeros[0] && populated < 1u64 << self.height).then_some(populated)
    }

    /// Inclusion proof for `value`
    pub fn proof(&self, value: Fr) -> Result<InclusionProof> {
        let index = self
            .index_of(value)
            .ok_or_else(|| WitnessError::NotFoundInTree {
                leaf: fr_to_string(&value),
            })?;
        self.proof_at(index)
    }

    /// Inclusion proof for the slot at `index`
    pub fn proof_at(&self, index: u64) -> Result<InclusionProof> {
        if index >= 1u64 << self.height {
            return Err(WitnessError::NotFoundInTree {
                leaf: format!("position {index}"),
            });
        }

        let mut path_elements = Vec::with_capacity(self.height);
        let mut path_indices = Vec::with_capacity(self.height);
        let mut position = index;
        for level in 0..self.height {
            path_indices.push((position & 1) as u8);
            path_elements.push(self.node(level, position ^ 1));
            position >>= 1;
        }

        Ok(InclusionProof {
            path_elements,
            path_indices,
            leaf: self.node(0, index),
            root: self.root(),
            leaf_index: index,
        })
    }
}
