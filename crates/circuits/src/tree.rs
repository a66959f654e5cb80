//! Dense native Merkle tree over bit-vector digests.
//!
//! Used to produce roots and authentication paths for the membership circuit.
//! Unused leaf slots hold the all-zero digest.

use std::marker::PhantomData;
use std::sync::Arc;

use ark_ff::PrimeField;
use r1cs_core::TwoToOneCrhGadget;
use rayon::prelude::*;

use crate::error::MembershipError;
use crate::path::{AuthenticationPath, AuthenticationPathNode};

/// Largest depth [`MerkleTree`] materialises.
pub const MAX_TREE_DEPTH: usize = 16;

pub struct MerkleTree<F: PrimeField, H: TwoToOneCrhGadget<F>> {
    params: Arc<H::Parameters>,
    depth: usize,
    /// `levels[0]` holds the leaves, `levels[depth]` the root.
    levels: Vec<Vec<Vec<bool>>>,
    _field: PhantomData<F>,
}

impl<F, H> MerkleTree<F, H>
where
    F: PrimeField,
    H: TwoToOneCrhGadget<F>,
    H::Parameters: Send + Sync,
{
    pub fn new(
        params: Arc<H::Parameters>,
        depth: usize,
        leaves: &[Vec<bool>],
    ) -> Result<Self, MembershipError> {
        if depth == 0 {
            return Err(MembershipError::ZeroDepth);
        }
        if depth > MAX_TREE_DEPTH {
            return Err(MembershipError::DepthTooLarge {
                depth,
                max: MAX_TREE_DEPTH,
            });
        }
        let capacity = 1usize << depth;
        if leaves.len() > capacity {
            return Err(MembershipError::IndexOutOfRange {
                index: leaves.len() as u64 - 1,
                capacity: capacity as u64,
            });
        }

        let digest_len = H::digest_len(&params);
        let mut level = Vec::with_capacity(capacity);
        for leaf in leaves {
            if leaf.len() != digest_len {
                return Err(MembershipError::DigestLengthMismatch {
                    what: "leaf",
                    expected: digest_len,
                    actual: leaf.len(),
                });
            }
            level.push(leaf.clone());
        }
        level.resize(capacity, vec![false; digest_len]);

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(level);
        for _ in 0..depth {
            let next = hash_level::<F, H>(&params, levels[levels.len() - 1].as_slice())?;
            levels.push(next);
        }

        tracing::debug!(depth, leaves = leaves.len(), "built merkle tree");

        Ok(Self {
            params,
            depth,
            levels,
            _field: PhantomData,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn root(&self) -> &[bool] {
        &self.levels[self.depth][0]
    }

    pub fn leaf(&self, index: u64) -> Result<&[bool], MembershipError> {
        let index = self.check_index(index)?;
        Ok(&self.levels[0][index])
    }

    /// Authentication path for the leaf at `index`, leaf level first.
    pub fn path(&self, index: u64) -> Result<AuthenticationPath, MembershipError> {
        let mut position = self.check_index(index)?;
        let mut nodes = Vec::with_capacity(self.depth);
        for level in &self.levels[..self.depth] {
            let is_right = position & 1 == 1;
            nodes.push(AuthenticationPathNode {
                sibling_is_right: !is_right,
                sibling: level[position ^ 1].clone(),
            });
            position >>= 1;
        }
        Ok(AuthenticationPath::new(nodes))
    }

    /// Replace one leaf and rehash its ancestors.
    pub fn set_leaf(&mut self, index: u64, leaf: Vec<bool>) -> Result<(), MembershipError> {
        let mut position = self.check_index(index)?;
        let digest_len = H::digest_len(&self.params);
        if leaf.len() != digest_len {
            return Err(MembershipError::DigestLengthMismatch {
                what: "leaf",
                expected: digest_len,
                actual: leaf.len(),
            });
        }

        self.levels[0][position] = leaf;
        for height in 0..self.depth {
            let left = position & !1;
            let block = [
                self.levels[height][left].as_slice(),
                self.levels[height][left + 1].as_slice(),
            ]
            .concat();
            position >>= 1;
            self.levels[height + 1][position] = H::evaluate(&self.params, &block)?;
        }
        Ok(())
    }

    fn check_index(&self, index: u64) -> Result<usize, MembershipError> {
        if index >= self.capacity() {
            return Err(MembershipError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(index as usize)
    }
}

fn hash_level<F, H>(params: &H::Parameters, level: &[Vec<bool>]) -> Result<Vec<Vec<bool>>, MembershipError>
where
    F: PrimeField,
    H: TwoToOneCrhGadget<F>,
    H::Parameters: Send + Sync,
{
    let next = level
        .par_chunks(2)
        .map(|pair| H::evaluate(params, &[pair[0].as_slice(), pair[1].as_slice()].concat()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::rand::{rngs::StdRng, Rng, SeedableRng};
    use knapsack_crh::{KnapsackCrhGadget, KnapsackParameters};

    type Hasher = KnapsackCrhGadget<Fr>;
    type Tree = MerkleTree<Fr, Hasher>;

    fn random_leaves(rng: &mut StdRng, count: usize) -> Vec<Vec<bool>> {
        (0..count)
            .map(|_| (0..254).map(|_| rng.gen()).collect())
            .collect()
    }

    #[test]
    fn test_paths_reach_root() {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        let mut rng = StdRng::seed_from_u64(21);
        let leaves = random_leaves(&mut rng, 5);
        let tree = Tree::new(params.clone(), 3, &leaves).unwrap();

        for index in 0..tree.capacity() {
            let path = tree.path(index).unwrap();
            assert_eq!(path.address(), Some(index));
            let root = path
                .compute_root::<Fr, Hasher>(&params, tree.leaf(index).unwrap())
                .unwrap();
            assert_eq!(root, tree.root());
        }
    }

    #[test]
    fn test_empty_slots_are_zero() {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        let tree = Tree::new(params, 2, &[]).unwrap();
        assert!(tree.leaf(3).unwrap().iter().all(|bit| !bit));
        // the knapsack hash of an all-zero block is zero
        assert!(tree.root().iter().all(|bit| !bit));
    }

    #[test]
    fn test_set_leaf_updates_root() {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        let mut rng = StdRng::seed_from_u64(22);
        let leaves = random_leaves(&mut rng, 4);
        let mut tree = Tree::new(params.clone(), 2, &leaves).unwrap();
        let old_root = tree.root().to_vec();

        let replacement = random_leaves(&mut rng, 1).remove(0);
        tree.set_leaf(2, replacement.clone()).unwrap();
        assert_ne!(tree.root(), old_root.as_slice());

        let mut updated = leaves;
        updated[2] = replacement;
        let rebuilt = Tree::new(params, 2, &updated).unwrap();
        assert_eq!(tree.root(), rebuilt.root());
    }

    #[test]
    fn test_index_out_of_range() {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        let tree = Tree::new(params, 2, &[]).unwrap();
        assert_eq!(
            tree.path(4).unwrap_err(),
            MembershipError::IndexOutOfRange {
                index: 4,
                capacity: 4
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        assert!(matches!(
            Tree::new(params, MAX_TREE_DEPTH + 1, &[]),
            Err(MembershipError::DepthTooLarge { .. })
        ));
    }
}
