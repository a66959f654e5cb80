//! Fixed-length vectors of boolean variables.

use ark_ff::PrimeField;

use crate::assignment::Assignment;
use crate::constraint::{ConstraintSystem, LinearCombination, Variable};
use crate::error::R1csError;

/// An ordered sequence of variables, each meant to hold 0 or 1.
///
/// Booleanity is not implied by the type; call
/// [`generate_boolean_constraints`](Self::generate_boolean_constraints) where it
/// has to be enforced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    bits: Vec<Variable>,
}

/// A hash input/output inside the circuit.
pub type Digest = BitArray;

impl BitArray {
    /// Allocate `len` private bits.
    pub fn new_witness<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        len: usize,
        annotation: &str,
    ) -> Self {
        let bits = (0..len)
            .map(|i| cs.alloc_witness(format!("{}[{}]", annotation, i)))
            .collect();
        Self { bits }
    }

    /// Allocate `len` public bits.
    pub fn new_input<F: PrimeField>(
        cs: &mut ConstraintSystem<F>,
        len: usize,
        annotation: &str,
    ) -> Self {
        let bits = (0..len)
            .map(|i| cs.alloc_input(format!("{}[{}]", annotation, i)))
            .collect();
        Self { bits }
    }

    pub fn from_variables(bits: Vec<Variable>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[Variable] {
        &self.bits
    }

    /// `self ‖ other`
    pub fn concat(&self, other: &BitArray) -> BitArray {
        let mut bits = Vec::with_capacity(self.len() + other.len());
        bits.extend_from_slice(&self.bits);
        bits.extend_from_slice(&other.bits);
        Self { bits }
    }

    /// Emit one `b * b = b` constraint per bit.
    pub fn generate_boolean_constraints<F: PrimeField>(
        &self,
        cs: &mut ConstraintSystem<F>,
        annotation: &str,
    ) {
        for (i, bit) in self.bits.iter().enumerate() {
            cs.enforce_boolean(*bit, format!("{}/bitness[{}]", annotation, i));
        }
    }

    /// `Σ 2^k · bit_k`, little-endian.
    pub fn packed<F: PrimeField>(&self) -> LinearCombination<F> {
        let mut lc = LinearCombination::zero();
        let mut coefficient = F::one();
        for bit in &self.bits {
            lc.push(coefficient, *bit);
            coefficient.double_in_place();
        }
        lc
    }

    pub fn assign<F: PrimeField>(
        &self,
        assignment: &mut Assignment<F>,
        values: &[bool],
    ) -> Result<(), R1csError> {
        if values.len() != self.bits.len() {
            return Err(R1csError::LengthMismatch {
                what: "bit array assignment",
                expected: self.bits.len(),
                actual: values.len(),
            });
        }
        for (bit, value) in self.bits.iter().zip(values) {
            assignment.assign_bool(*bit, *value)?;
        }
        Ok(())
    }

    pub fn value<F: PrimeField>(&self, assignment: &Assignment<F>) -> Result<Vec<bool>, R1csError> {
        self.bits.iter().map(|bit| assignment.bool_value(*bit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_bitness_constraints() {
        let mut cs = ConstraintSystem::<Fr>::new();
        let digest = BitArray::new_witness(&mut cs, 8, "digest");
        digest.generate_boolean_constraints(&mut cs, "digest");
        assert_eq!(cs.num_constraints(), 8);
        assert_eq!(cs.num_witness_variables(), 8);

        let mut assignment = Assignment::for_system(&cs);
        digest
            .assign(&mut assignment, &[true, false, true, true, false, false, true, false])
            .unwrap();
        assert!(cs.is_satisfied(&assignment).unwrap());

        assignment.assign(digest.bits()[3], Fr::from(5u64)).unwrap();
        let failing = cs.which_is_unsatisfied(&assignment).unwrap().unwrap();
        assert_eq!(failing.annotation, "digest/bitness[3]");
    }

    #[test]
    fn test_assign_length_mismatch() {
        let mut cs = ConstraintSystem::<Fr>::new();
        let digest = BitArray::new_witness(&mut cs, 4, "digest");
        let mut assignment = Assignment::for_system(&cs);

        let err = digest.assign(&mut assignment, &[true, false]).unwrap_err();
        assert_eq!(
            err,
            R1csError::LengthMismatch {
                what: "bit array assignment",
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_packed_value() {
        let mut cs = ConstraintSystem::<Fr>::new();
        let digest = BitArray::new_witness(&mut cs, 4, "digest");
        let mut assignment = Assignment::for_system(&cs);
        // 0b1011 little-endian = 13
        digest.assign(&mut assignment, &[true, false, true, true]).unwrap();
        let packed = digest.packed::<Fr>().evaluate(&assignment).unwrap();
        assert_eq!(packed, Fr::from(13u64));
        assert_eq!(digest.value(&assignment).unwrap(), vec![true, false, true, true]);
    }
}
