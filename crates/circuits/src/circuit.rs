//! A complete membership statement: public root, private leaf and address.

use std::sync::Arc;

use ark_ff::PrimeField;
use r1cs_core::{
    ArkCircuit, Assignment, BitArray, ConstraintSystem, Digest, R1csError, TwoToOneCrhGadget,
};

use crate::error::MembershipError;
use crate::membership::MembershipGadget;
use crate::path::AuthenticationPath;

/// Owns a constraint system holding one [`MembershipGadget`].
///
/// Variable layout:
/// - public inputs: the root digest bits
/// - witnesses: leaf bits, address bits, then everything the gadget allocates
///
/// Bitness of the leaf, root and address bits is enforced here rather than in
/// the gadget, so [`gadget_constraints`](Self::gadget_constraints) counts only
/// what the gadget itself emitted.
pub struct MembershipCircuit<F: PrimeField, H: TwoToOneCrhGadget<F>> {
    cs: ConstraintSystem<F>,
    leaf: Digest,
    root: Digest,
    address_bits: BitArray,
    gadget: MembershipGadget<F, H>,
    gadget_constraints: usize,
}

impl<F: PrimeField, H: TwoToOneCrhGadget<F>> MembershipCircuit<F, H> {
    pub fn new(params: Arc<H::Parameters>, depth: usize) -> Result<Self, MembershipError> {
        let digest_len = H::digest_len(&params);
        let mut cs = ConstraintSystem::new();

        let root = Digest::new_input(&mut cs, digest_len, "root");
        let leaf = Digest::new_witness(&mut cs, digest_len, "leaf");
        let address_bits = BitArray::new_witness(&mut cs, depth, "address");

        let gadget = MembershipGadget::new(
            &mut cs,
            params,
            depth,
            &leaf,
            &root,
            &address_bits,
            "membership",
        )?;

        leaf.generate_boolean_constraints(&mut cs, "leaf");
        root.generate_boolean_constraints(&mut cs, "root");
        address_bits.generate_boolean_constraints(&mut cs, "address");

        let before = cs.num_constraints();
        gadget.generate_constraints(&mut cs)?;
        let gadget_constraints = cs.num_constraints() - before;

        tracing::info!(
            depth,
            digest_len,
            gadget_constraints,
            total_constraints = cs.num_constraints(),
            "built membership circuit"
        );

        Ok(Self {
            cs,
            leaf,
            root,
            address_bits,
            gadget,
            gadget_constraints,
        })
    }

    /// Witness the circuit for one opening.
    pub fn assign(
        &self,
        leaf: &[bool],
        root: &[bool],
        path: &AuthenticationPath,
    ) -> Result<Assignment<F>, MembershipError> {
        let mut assignment = Assignment::for_system(&self.cs);
        self.gadget.generate_witness(&mut assignment, leaf, root, path)?;
        Ok(assignment)
    }

    pub fn is_satisfied(&self, assignment: &Assignment<F>) -> Result<bool, MembershipError> {
        let satisfied = self.cs.is_satisfied(assignment).map_err(|e| {
            if let R1csError::AssignmentMissing(variable) = e {
                tracing::debug!(
                    variable = self.cs.variable_annotation(variable).unwrap_or("?"),
                    "membership variable unassigned"
                );
            }
            e
        })?;
        if !satisfied {
            if let Ok(Some(constraint)) = self.cs.which_is_unsatisfied(assignment) {
                tracing::debug!(
                    index = constraint.index,
                    annotation = %constraint.annotation,
                    "membership constraint unsatisfied"
                );
            }
        }
        Ok(satisfied)
    }

    /// Public input vector for a root, in allocation order.
    pub fn public_inputs(root: &[bool]) -> Vec<F> {
        root.iter().map(|bit| F::from(*bit)).collect()
    }

    pub fn to_ark_setup(&self) -> ArkCircuit<'_, F> {
        ArkCircuit::setup(&self.cs)
    }

    pub fn to_ark<'a>(&'a self, assignment: &'a Assignment<F>) -> ArkCircuit<'a, F> {
        ArkCircuit::with_assignment(&self.cs, assignment)
    }

    pub fn constraint_system(&self) -> &ConstraintSystem<F> {
        &self.cs
    }

    pub fn gadget(&self) -> &MembershipGadget<F, H> {
        &self.gadget
    }

    /// Constraints emitted by the gadget alone.
    pub fn gadget_constraints(&self) -> usize {
        self.gadget_constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.cs.num_constraints()
    }

    pub fn depth(&self) -> usize {
        self.gadget.depth()
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
}
