//! Merkle-tree membership gadget.
//!
//! Proves that a leaf digest sits at the position named by `address_bits` in a
//! binary hash tree with the given root. The tree is walked through `depth`
//! levels, each made of a [`DigestSelector`] that places the digest being
//! carried into the left or right slot, and a hash gadget compressing
//! `left ‖ right` into the digest for the level above.
//!
//! Internal level `i` runs from 0 (children of the root) to `depth - 1`
//! (the leaf and its sibling). Address bits and authentication paths are
//! indexed leaf-first; [`level_to_address_index`] converts between the two.

use std::marker::PhantomData;
use std::sync::Arc;

use ark_ff::PrimeField;
use r1cs_core::{
    Assignment, BitArray, ConstraintSystem, Digest, OutputAssignment, TwoToOneCrhGadget,
};

use crate::error::MembershipError;
use crate::path::AuthenticationPath;
use crate::selector::DigestSelector;

/// Position in the leaf-first address bit vector for internal level `level`.
///
/// `level` must be below `depth`; debug builds assert it.
pub fn level_to_address_index(depth: usize, level: usize) -> usize {
    debug_assert!(level < depth, "level {} outside a tree of depth {}", level, depth);
    depth - 1 - level
}

/// Where a per-level recomputation first disagrees with an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelFault {
    /// The selected slot does not hold the digest carried up from below.
    Selector { level: usize },
    /// The level's output digest is not the hash of its slots.
    Hash { level: usize },
}

pub struct MembershipGadget<F: PrimeField, H: TwoToOneCrhGadget<F>> {
    params: Arc<H::Parameters>,
    depth: usize,
    digest_len: usize,

    leaf: Digest,
    root: Digest,
    address_bits: BitArray,

    left_digests: Vec<Digest>,
    right_digests: Vec<Digest>,
    internal_outputs: Vec<Digest>,
    hashers: Vec<H>,
    selectors: Vec<DigestSelector>,

    annotation: String,
    _field: PhantomData<F>,
}

impl<F: PrimeField, H: TwoToOneCrhGadget<F>> MembershipGadget<F, H> {
    /// Allocate the gadget's internal digests and sub-gadgets.
    ///
    /// `leaf`, `root` and `address_bits` belong to the caller, who is also
    /// responsible for their bitness constraints.
    pub fn new(
        cs: &mut ConstraintSystem<F>,
        params: Arc<H::Parameters>,
        depth: usize,
        leaf: &Digest,
        root: &Digest,
        address_bits: &BitArray,
        annotation: &str,
    ) -> Result<Self, MembershipError> {
        if depth == 0 {
            return Err(MembershipError::ZeroDepth);
        }
        if address_bits.len() != depth {
            return Err(MembershipError::AddressLengthMismatch {
                expected: depth,
                actual: address_bits.len(),
            });
        }
        let digest_len = H::digest_len(&params);
        for (what, digest) in [("leaf", leaf), ("root", root)] {
            if digest.len() != digest_len {
                return Err(MembershipError::DigestLengthMismatch {
                    what,
                    expected: digest_len,
                    actual: digest.len(),
                });
            }
        }

        let left_digests: Vec<Digest> = (0..depth)
            .map(|i| Digest::new_witness(cs, digest_len, &format!("{}/level_{}/left", annotation, i)))
            .collect();
        let right_digests: Vec<Digest> = (0..depth)
            .map(|i| Digest::new_witness(cs, digest_len, &format!("{}/level_{}/right", annotation, i)))
            .collect();
        let internal_outputs: Vec<Digest> = (0..depth - 1)
            .map(|i| {
                Digest::new_witness(cs, digest_len, &format!("{}/internal_output_{}", annotation, i))
            })
            .collect();

        let mut hashers = Vec::with_capacity(depth);
        let mut selectors = Vec::with_capacity(depth);
        for i in 0..depth {
            let output = if i == 0 { root } else { &internal_outputs[i - 1] };
            hashers.push(H::new(
                cs,
                params.clone(),
                &left_digests[i],
                &right_digests[i],
                output,
                &format!("{}/level_{}/hash", annotation, i),
            )?);

            let claimed = if i == depth - 1 { leaf } else { &internal_outputs[i] };
            let bit = address_bits.bits()[level_to_address_index(depth, i)];
            selectors.push(DigestSelector::new(
                claimed,
                bit,
                &left_digests[i],
                &right_digests[i],
            )?);
        }

        tracing::debug!(depth, digest_len, annotation, "allocated membership gadget");

        Ok(Self {
            params,
            depth,
            digest_len,
            leaf: leaf.clone(),
            root: root.clone(),
            address_bits: address_bits.clone(),
            left_digests,
            right_digests,
            internal_outputs,
            hashers,
            selectors,
            annotation: annotation.to_string(),
            _field: PhantomData,
        })
    }

    /// Constraints emitted by [`generate_constraints`](Self::generate_constraints)
    /// for a tree of `depth` levels.
    pub fn expected_constraint_count(params: &H::Parameters, depth: usize) -> usize {
        let digest_len = H::digest_len(params);
        let hasher_constraints = depth * H::expected_constraints(params, false);
        let selector_constraints = depth * digest_len;
        let slot_bitness_constraints = 2 * depth * digest_len;
        hasher_constraints + selector_constraints + slot_bitness_constraints
    }

    /// Emit the gadget's constraints. Call exactly once.
    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<F>) -> Result<(), MembershipError> {
        for i in 0..self.depth {
            self.left_digests[i]
                .generate_boolean_constraints(cs, &format!("{}/level_{}/left", self.annotation, i));
            self.right_digests[i]
                .generate_boolean_constraints(cs, &format!("{}/level_{}/right", self.annotation, i));
        }

        // Every hash output is either the caller's root or the next level's
        // claimed digest, whose bitness follows from the slot it is copied into.
        for hasher in &self.hashers {
            hasher.generate_constraints(cs, false)?;
        }

        for (i, selector) in self.selectors.iter().enumerate() {
            selector.generate_constraints(cs, &format!("{}/level_{}/select", self.annotation, i));
        }

        tracing::debug!(
            depth = self.depth,
            constraints = cs.num_constraints(),
            "generated membership constraints"
        );
        Ok(())
    }

    /// Fill every variable of the gadget for one leaf, root and path.
    ///
    /// The root is assigned as given and never recomputed, so a path that does
    /// not hash to it leaves the system unsatisfied rather than failing here.
    pub fn generate_witness(
        &self,
        assignment: &mut Assignment<F>,
        leaf: &[bool],
        root: &[bool],
        path: &AuthenticationPath,
    ) -> Result<(), MembershipError> {
        if path.depth() != self.depth {
            return Err(MembershipError::PathLengthMismatch {
                expected: self.depth,
                actual: path.depth(),
            });
        }

        self.leaf.assign(assignment, leaf)?;
        self.root.assign(assignment, root)?;

        for i in (0..self.depth).rev() {
            let address_index = level_to_address_index(self.depth, i);
            let node = &path.nodes()[address_index];
            let claimed_is_right = node.address_bit();

            assignment.assign_bool(self.address_bits.bits()[address_index], claimed_is_right)?;
            if claimed_is_right {
                self.left_digests[i].assign(assignment, &node.sibling)?;
            } else {
                self.right_digests[i].assign(assignment, &node.sibling)?;
            }

            self.selectors[i].generate_witness(assignment)?;

            let output = if i == 0 {
                OutputAssignment::Preassigned
            } else {
                OutputAssignment::Compute
            };
            self.hashers[i].generate_witness(assignment, output)?;
        }
        Ok(())
    }

    /// Recompute every level natively from `assignment` and report the first
    /// level, walking from the leaf up, that the assignment gets wrong.
    ///
    /// Debugging aid for unsatisfied systems; the constraints do not depend on it.
    pub fn diagnose(&self, assignment: &Assignment<F>) -> Result<Option<LevelFault>, MembershipError> {
        for i in (0..self.depth).rev() {
            let claimed = self.claimed(i).value(assignment)?;
            let left = self.left_digests[i].value(assignment)?;
            let right = self.right_digests[i].value(assignment)?;

            let bit = self.address_bits.bits()[level_to_address_index(self.depth, i)];
            let selected = if assignment.bool_value(bit)? { &right } else { &left };
            if *selected != claimed {
                return Ok(Some(LevelFault::Selector { level: i }));
            }

            let expected = H::evaluate(&self.params, &[left, right].concat())?;
            if self.output(i).value(assignment)? != expected {
                return Ok(Some(LevelFault::Hash { level: i }));
            }
        }
        Ok(None)
    }

    fn claimed(&self, level: usize) -> &Digest {
        if level == self.depth - 1 {
            &self.leaf
        } else {
            &self.internal_outputs[level]
        }
    }

    fn output(&self, level: usize) -> &Digest {
        if level == 0 {
            &self.root
        } else {
            &self.internal_outputs[level - 1]
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    pub fn leaf(&self) -> &Digest {
        &self.leaf
    }

    pub fn root(&self) -> &Digest {
        &self.root
    }

    pub fn address_bits(&self) -> &BitArray {
        &self.address_bits
    }

    pub fn left_digests(&self) -> &[Digest] {
        &self.left_digests
    }

    pub fn right_digests(&self) -> &[Digest] {
        &self.right_digests
    }

    pub fn internal_outputs(&self) -> &[Digest] {
        &self.internal_outputs
    }
}
