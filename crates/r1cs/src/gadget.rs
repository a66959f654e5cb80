//! Contract for two-to-one compression gadgets with bit-level digests.

use std::sync::Arc;

use ark_ff::PrimeField;

use crate::assignment::Assignment;
use crate::bits::Digest;
use crate::constraint::ConstraintSystem;
use crate::error::R1csError;

/// Whether a hash gadget writes its output digest during witness generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputAssignment {
    /// Compute the output bits and assign them.
    Compute,
    /// The caller already assigned the output; leave it untouched so the
    /// constraints check it instead of overwriting it.
    Preassigned,
}

/// A keyed compression function `H(key, left ‖ right) -> digest` together with
/// its circuit fragment.
///
/// The key lives in `Parameters`, sampled once by the caller and shared by
/// every instance through an `Arc`.
pub trait TwoToOneCrhGadget<F: PrimeField>: Sized {
    type Parameters;

    /// Output length in bits. Inputs are two digests of this length.
    fn digest_len(params: &Self::Parameters) -> usize;

    /// Number of constraints [`generate_constraints`](Self::generate_constraints) emits.
    fn expected_constraints(params: &Self::Parameters, enforce_output_bitness: bool) -> usize;

    /// Native evaluation over a `2 * digest_len` input block.
    fn evaluate(params: &Self::Parameters, input: &[bool]) -> Result<Vec<bool>, R1csError>;

    /// Allocate the gadget's internal variables.
    fn new(
        cs: &mut ConstraintSystem<F>,
        params: Arc<Self::Parameters>,
        left: &Digest,
        right: &Digest,
        output: &Digest,
        annotation: &str,
    ) -> Result<Self, R1csError>;

    /// Emit constraints enforcing `output = H(left ‖ right)`.
    fn generate_constraints(
        &self,
        cs: &mut ConstraintSystem<F>,
        enforce_output_bitness: bool,
    ) -> Result<(), R1csError>;

    /// Fill internal values (and the output, per `output`) from the assigned
    /// input digests.
    fn generate_witness(
        &self,
        assignment: &mut Assignment<F>,
        output: OutputAssignment,
    ) -> Result<(), R1csError>;
}
