//! Two-way digest multiplexer.

use ark_ff::PrimeField;
use r1cs_core::{Assignment, ConstraintSystem, Digest, LinearCombination, R1csError, Variable};

/// Places a claimed digest into the left or right slot of a hash input.
///
/// For every bit `k` it enforces `b · (right[k] − left[k]) = claimed[k] − left[k]`:
/// with `b = 0` the left slot must equal the claimed digest, with `b = 1` the
/// right slot must. The other slot is left free for the sibling digest.
/// The selector does not own any of the digests it wires together.
#[derive(Clone, Debug)]
pub struct DigestSelector {
    claimed: Digest,
    bit: Variable,
    left: Digest,
    right: Digest,
}

impl DigestSelector {
    pub fn new(
        claimed: &Digest,
        bit: Variable,
        left: &Digest,
        right: &Digest,
    ) -> Result<Self, R1csError> {
        for (what, slot) in [("selector left slot", left), ("selector right slot", right)] {
            if slot.len() != claimed.len() {
                return Err(R1csError::LengthMismatch {
                    what,
                    expected: claimed.len(),
                    actual: slot.len(),
                });
            }
        }
        Ok(Self {
            claimed: claimed.clone(),
            bit,
            left: left.clone(),
            right: right.clone(),
        })
    }

    /// Emits exactly one constraint per digest bit.
    pub fn generate_constraints<F: PrimeField>(&self, cs: &mut ConstraintSystem<F>, annotation: &str) {
        let slots = self.left.bits().iter().zip(self.right.bits());
        for (k, (claimed, (left, right))) in self.claimed.bits().iter().zip(slots).enumerate() {
            cs.enforce(
                LinearCombination::from(self.bit),
                LinearCombination::from(*right) - *left,
                LinearCombination::from(*claimed) - *left,
                format!("{}[{}]", annotation, k),
            );
        }
    }

    /// Copy the claimed digest into the slot the direction bit selects.
    ///
    /// The claimed digest and the bit must already be assigned.
    pub fn generate_witness<F: PrimeField>(&self, assignment: &mut Assignment<F>) -> Result<(), R1csError> {
        let claimed_is_right = assignment.bool_value(self.bit)?;
        let claimed = self.claimed.value(assignment)?;
        if claimed_is_right {
            self.right.assign(assignment, &claimed)
        } else {
            self.left.assign(assignment, &claimed)
        }
    }
}
