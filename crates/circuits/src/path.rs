//! Native authentication paths.

use ark_ff::PrimeField;
use ark_std::rand::Rng;
use r1cs_core::{R1csError, TwoToOneCrhGadget};

/// One level of an authentication path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationPathNode {
    /// The sibling is the right child, so the digest being proven is the left one.
    pub sibling_is_right: bool,
    pub sibling: Vec<bool>,
}

impl AuthenticationPathNode {
    /// Address bit for this level: set when the digest being proven is the
    /// right child.
    pub fn address_bit(&self) -> bool {
        !self.sibling_is_right
    }

    /// The hash input block for `current` at this level.
    pub fn block(&self, current: &[bool]) -> Vec<bool> {
        if self.sibling_is_right {
            [current, self.sibling.as_slice()].concat()
        } else {
            [self.sibling.as_slice(), current].concat()
        }
    }
}

/// Sibling digests from the leaf level (`nodes[0]`) up to the level below the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthenticationPath {
    nodes: Vec<AuthenticationPathNode>,
}

impl AuthenticationPath {
    pub fn new(nodes: Vec<AuthenticationPathNode>) -> Self {
        Self { nodes }
    }

    /// A path with random directions and random siblings.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, depth: usize, digest_len: usize) -> Self {
        let nodes = (0..depth)
            .map(|_| AuthenticationPathNode {
                sibling_is_right: rng.gen(),
                sibling: (0..digest_len).map(|_| rng.gen()).collect(),
            })
            .collect();
        Self { nodes }
    }

    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[AuthenticationPathNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [AuthenticationPathNode] {
        &mut self.nodes
    }

    /// Address bits, leaf level first.
    pub fn address_bits(&self) -> Vec<bool> {
        self.nodes.iter().map(AuthenticationPathNode::address_bit).collect()
    }

    /// The leaf index this path opens; `None` for paths deeper than 64 levels.
    pub fn address(&self) -> Option<u64> {
        if self.nodes.len() > 64 {
            return None;
        }
        Some(
            self.address_bits()
                .iter()
                .enumerate()
                .fold(0u64, |acc, (k, bit)| acc | ((*bit as u64) << k)),
        )
    }

    /// Every digest on the way from `leaf` to the root, leaf first and root last.
    pub fn digests<F, H>(&self, params: &H::Parameters, leaf: &[bool]) -> Result<Vec<Vec<bool>>, R1csError>
    where
        F: PrimeField,
        H: TwoToOneCrhGadget<F>,
    {
        let mut chain = Vec::with_capacity(self.nodes.len() + 1);
        chain.push(leaf.to_vec());
        for node in &self.nodes {
            let current = chain.last().map(Vec::as_slice).unwrap_or_default();
            let next = H::evaluate(params, &node.block(current))?;
            chain.push(next);
        }
        Ok(chain)
    }

    /// Hash `leaf` up the path.
    pub fn compute_root<F, H>(&self, params: &H::Parameters, leaf: &[bool]) -> Result<Vec<bool>, R1csError>
    where
        F: PrimeField,
        H: TwoToOneCrhGadget<F>,
    {
        let mut chain = self.digests::<F, H>(params, leaf)?;
        Ok(chain.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use knapsack_crh::{KnapsackCrhGadget, KnapsackParameters};

    type Hasher = KnapsackCrhGadget<Fr>;

    #[test]
    fn test_address_bits() {
        let node = |sibling_is_right| AuthenticationPathNode {
            sibling_is_right,
            sibling: vec![],
        };
        // leaf is the right child at level 0 and 2, left child at level 1
        let path = AuthenticationPath::new(vec![node(false), node(true), node(false)]);
        assert_eq!(path.address_bits(), vec![true, false, true]);
        assert_eq!(path.address(), Some(0b101));
    }

    #[test]
    fn test_block_order() {
        let node = AuthenticationPathNode {
            sibling_is_right: true,
            sibling: vec![false, false],
        };
        assert_eq!(node.block(&[true, true]), vec![true, true, false, false]);

        let node = AuthenticationPathNode {
            sibling_is_right: false,
            sibling: vec![false, false],
        };
        assert_eq!(node.block(&[true, true]), vec![false, false, true, true]);
    }

    #[test]
    fn test_compute_root_matches_manual_hashing() {
        let params = KnapsackParameters::<Fr>::for_two_to_one(1);
        let digest_len = params.digest_len();
        let mut rng = StdRng::seed_from_u64(3);

        let leaf: Vec<bool> = (0..digest_len).map(|_| rng.gen()).collect();
        let path = AuthenticationPath::random(&mut rng, 2, digest_len);

        let mut expected = leaf.clone();
        for node in path.nodes() {
            expected = params.hash(&node.block(&expected)).unwrap();
        }

        let chain = path.digests::<Fr, Hasher>(&params, &leaf).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], leaf);
        assert_eq!(path.compute_root::<Fr, Hasher>(&params, &leaf).unwrap(), expected);
    }
}
