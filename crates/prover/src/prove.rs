//! Groth16 proof generation.

use std::sync::Arc;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use knapsack_crh::{KnapsackCrhGadget, KnapsackParameters};
use membership_circuits::{AuthenticationPath, KnapsackMembershipCircuit, MembershipError};
use thiserror::Error;

/// Errors during proof generation
#[derive(Error, Debug)]
pub enum ProveError {
    #[error("Circuit construction failed: {0}")]
    Circuit(#[from] MembershipError),
    #[error("Witness does not satisfy the membership constraints")]
    Unsatisfied,
    #[error("Proof generation failed: {0}")]
    Proving(String),
}

/// Result of proof generation
#[derive(Clone, Debug)]
pub struct MembershipProof {
    pub proof: Proof<Bn254>,
    /// The root the leaf was opened against.
    pub root: Vec<bool>,
    pub public_inputs: Vec<Fr>,
}

/// Prove that `leaf` opens `path` to the root it hashes to.
///
/// The circuit depth is the path length; `pk` must come from a setup of the
/// same depth and parameters.
pub fn prove_membership<R: RngCore + CryptoRng>(
    pk: &ProvingKey<Bn254>,
    params: Arc<KnapsackParameters<Fr>>,
    leaf: &[bool],
    path: &AuthenticationPath,
    rng: &mut R,
) -> Result<MembershipProof, ProveError> {
    let root = path
        .compute_root::<Fr, KnapsackCrhGadget<Fr>>(&params, leaf)
        .map_err(MembershipError::from)?;

    let circuit = KnapsackMembershipCircuit::<Fr>::new(params, path.depth())?;
    let assignment = circuit.assign(leaf, &root, path)?;
    if !circuit.is_satisfied(&assignment)? {
        return Err(ProveError::Unsatisfied);
    }

    tracing::debug!(depth = path.depth(), address = ?path.address(), "proving membership");
    let proof = Groth16::<Bn254>::prove(pk, circuit.to_ark(&assignment), rng)
        .map_err(|e| ProveError::Proving(e.to_string()))?;

    Ok(MembershipProof {
        proof,
        public_inputs: KnapsackMembershipCircuit::<Fr>::public_inputs(&root),
        root,
    })
}
