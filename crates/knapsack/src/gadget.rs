//! Knapsack hash gadget with bit-level output.

use std::sync::Arc;

use ark_ff::PrimeField;
use r1cs_core::{
    Assignment, BitArray, ConstraintSystem, Digest, LinearCombination, OutputAssignment,
    R1csError, TwoToOneCrhGadget, Variable,
};

use crate::params::{field_to_bits, KnapsackParameters};

/// Circuit for `output = H(left ‖ right)`.
///
/// Per output element `i` it allocates one field variable `y_i` and emits
/// - `(Σ_j a_{i,j} · x_j) · 1 = y_i`
/// - `1 · (Σ_k 2^k · out_{i,k}) = y_i`
///
/// plus, on request, bitness of the output digest.
pub struct KnapsackCrhGadget<F: PrimeField> {
    params: Arc<KnapsackParameters<F>>,
    input: BitArray,
    output: Digest,
    field_outputs: Vec<Variable>,
    annotation: String,
}

impl<F: PrimeField> KnapsackCrhGadget<F> {
    pub fn input(&self) -> &BitArray {
        &self.input
    }

    pub fn output(&self) -> &Digest {
        &self.output
    }

    /// Output bits belonging to element `i`.
    fn output_chunk(&self, i: usize) -> BitArray {
        let width = KnapsackParameters::<F>::element_bits();
        BitArray::from_variables(self.output.bits()[i * width..(i + 1) * width].to_vec())
    }
}

impl<F: PrimeField> TwoToOneCrhGadget<F> for KnapsackCrhGadget<F> {
    type Parameters = KnapsackParameters<F>;

    fn digest_len(params: &Self::Parameters) -> usize {
        params.digest_len()
    }

    fn expected_constraints(params: &Self::Parameters, enforce_output_bitness: bool) -> usize {
        let field_output_constraints = params.dimension();
        let packing_constraints = params.dimension();
        let bitness_constraints = if enforce_output_bitness {
            params.digest_len()
        } else {
            0
        };
        field_output_constraints + packing_constraints + bitness_constraints
    }

    fn evaluate(params: &Self::Parameters, input: &[bool]) -> Result<Vec<bool>, R1csError> {
        params.hash(input)
    }

    fn new(
        cs: &mut ConstraintSystem<F>,
        params: Arc<Self::Parameters>,
        left: &Digest,
        right: &Digest,
        output: &Digest,
        annotation: &str,
    ) -> Result<Self, R1csError> {
        let digest_len = params.digest_len();
        if params.input_len() != 2 * digest_len {
            return Err(R1csError::ParametersMismatch {
                expected: 2 * digest_len,
                actual: params.input_len(),
            });
        }
        for (what, digest) in [
            ("knapsack left input", left),
            ("knapsack right input", right),
            ("knapsack output", output),
        ] {
            if digest.len() != digest_len {
                return Err(R1csError::LengthMismatch {
                    what,
                    expected: digest_len,
                    actual: digest.len(),
                });
            }
        }

        let field_outputs = (0..params.dimension())
            .map(|i| cs.alloc_witness(format!("{}/field_output[{}]", annotation, i)))
            .collect();

        Ok(Self {
            params,
            input: left.concat(right),
            output: output.clone(),
            field_outputs,
            annotation: annotation.to_string(),
        })
    }

    fn generate_constraints(
        &self,
        cs: &mut ConstraintSystem<F>,
        enforce_output_bitness: bool,
    ) -> Result<(), R1csError> {
        for (i, y) in self.field_outputs.iter().enumerate() {
            let mut sum = LinearCombination::zero();
            for (coefficient, bit) in self.params.row(i).iter().zip(self.input.bits()) {
                sum.push(*coefficient, *bit);
            }
            cs.enforce(
                sum,
                Variable::One.into(),
                (*y).into(),
                format!("{}/field_output[{}]", self.annotation, i),
            );
            cs.enforce(
                Variable::One.into(),
                self.output_chunk(i).packed(),
                (*y).into(),
                format!("{}/packing[{}]", self.annotation, i),
            );
        }

        if enforce_output_bitness {
            self.output
                .generate_boolean_constraints(cs, &format!("{}/output", self.annotation));
        }
        Ok(())
    }

    fn generate_witness(
        &self,
        assignment: &mut Assignment<F>,
        output: OutputAssignment,
    ) -> Result<(), R1csError> {
        let input = self.input.value(assignment)?;
        let elements = self.params.hash_to_field(&input)?;

        for (y, value) in self.field_outputs.iter().zip(&elements) {
            assignment.assign(*y, *value)?;
        }

        if output == OutputAssignment::Compute {
            let bits: Vec<bool> = elements.iter().flat_map(|e| field_to_bits(*e)).collect();
            self.output.assign(assignment, &bits)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::rand::{rngs::StdRng, Rng, SeedableRng};

    struct Fixture {
        cs: ConstraintSystem<Fr>,
        left: Digest,
        right: Digest,
        output: Digest,
        gadget: KnapsackCrhGadget<Fr>,
    }

    fn fixture(dimension: usize) -> Fixture {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(dimension));
        let digest_len = params.digest_len();

        let mut cs = ConstraintSystem::<Fr>::new();
        let left = BitArray::new_witness(&mut cs, digest_len, "left");
        let right = BitArray::new_witness(&mut cs, digest_len, "right");
        let output = BitArray::new_witness(&mut cs, digest_len, "output");
        let gadget =
            KnapsackCrhGadget::new(&mut cs, params, &left, &right, &output, "hash").unwrap();

        Fixture {
            cs,
            left,
            right,
            output,
            gadget,
        }
    }

    fn random_bits(rng: &mut StdRng, len: usize) -> Vec<bool> {
        (0..len).map(|_| rng.gen()).collect()
    }

    #[test]
    fn test_constraint_count() {
        for dimension in [1, 2] {
            for enforce in [false, true] {
                let mut f = fixture(dimension);
                f.gadget.generate_constraints(&mut f.cs, enforce).unwrap();
                assert_eq!(
                    f.cs.num_constraints(),
                    <KnapsackCrhGadget<Fr> as TwoToOneCrhGadget<Fr>>::expected_constraints(
                        &f.gadget.params,
                        enforce
                    )
                );
            }
        }
    }

    #[test]
    fn test_witness_satisfies_constraints() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut f = fixture(1);
        f.gadget.generate_constraints(&mut f.cs, true).unwrap();

        let left_bits = random_bits(&mut rng, f.left.len());
        let right_bits = random_bits(&mut rng, f.right.len());

        let mut assignment = Assignment::for_system(&f.cs);
        f.left.assign(&mut assignment, &left_bits).unwrap();
        f.right.assign(&mut assignment, &right_bits).unwrap();
        f.gadget
            .generate_witness(&mut assignment, OutputAssignment::Compute)
            .unwrap();

        assert!(f.cs.is_satisfied(&assignment).unwrap());

        let block = [left_bits, right_bits].concat();
        let expected = f.gadget.params.hash(&block).unwrap();
        assert_eq!(f.output.value(&assignment).unwrap(), expected);
    }

    #[test]
    fn test_wrong_preassigned_output_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut f = fixture(1);
        f.gadget.generate_constraints(&mut f.cs, false).unwrap();

        let left_bits = random_bits(&mut rng, f.left.len());
        let right_bits = random_bits(&mut rng, f.right.len());
        let block = [left_bits.clone(), right_bits.clone()].concat();
        let mut output_bits = f.gadget.params.hash(&block).unwrap();

        let mut assignment = Assignment::for_system(&f.cs);
        f.left.assign(&mut assignment, &left_bits).unwrap();
        f.right.assign(&mut assignment, &right_bits).unwrap();
        f.output.assign(&mut assignment, &output_bits).unwrap();
        f.gadget
            .generate_witness(&mut assignment, OutputAssignment::Preassigned)
            .unwrap();
        assert!(f.cs.is_satisfied(&assignment).unwrap());

        output_bits[5] = !output_bits[5];
        f.output.assign(&mut assignment, &output_bits).unwrap();
        f.gadget
            .generate_witness(&mut assignment, OutputAssignment::Preassigned)
            .unwrap();
        let failing = f.cs.which_is_unsatisfied(&assignment).unwrap().unwrap();
        assert_eq!(failing.annotation, "hash/packing[0]");
    }

    #[test]
    fn test_preassigned_output_stays_unassigned() {
        let mut f = fixture(1);
        f.gadget.generate_constraints(&mut f.cs, false).unwrap();

        let mut assignment = Assignment::for_system(&f.cs);
        f.left.assign(&mut assignment, &vec![false; f.left.len()]).unwrap();
        f.right.assign(&mut assignment, &vec![true; f.right.len()]).unwrap();
        f.gadget
            .generate_witness(&mut assignment, OutputAssignment::Preassigned)
            .unwrap();

        assert!(matches!(
            f.cs.is_satisfied(&assignment),
            Err(R1csError::AssignmentMissing(_))
        ));
    }

    #[test]
    fn test_rejects_mismatched_parameters() {
        let params = Arc::new(KnapsackParameters::<Fr>::sample(100));
        let mut cs = ConstraintSystem::<Fr>::new();
        let digest_len = params.digest_len();
        let left = BitArray::new_witness(&mut cs, digest_len, "left");
        let right = BitArray::new_witness(&mut cs, digest_len, "right");
        let output = BitArray::new_witness(&mut cs, digest_len, "output");

        let result = KnapsackCrhGadget::new(&mut cs, params, &left, &right, &output, "hash");
        assert_eq!(
            result.err(),
            Some(R1csError::ParametersMismatch {
                expected: 508,
                actual: 100
            })
        );
    }

    #[test]
    fn test_rejects_short_digest() {
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        let mut cs = ConstraintSystem::<Fr>::new();
        let left = BitArray::new_witness(&mut cs, 254, "left");
        let right = BitArray::new_witness(&mut cs, 253, "right");
        let output = BitArray::new_witness(&mut cs, 254, "output");

        let result = KnapsackCrhGadget::new(&mut cs, params, &left, &right, &output, "hash");
        assert!(matches!(
            result,
            Err(R1csError::LengthMismatch {
                what: "knapsack right input",
                expected: 254,
                actual: 253
            })
        ));
    }
}
