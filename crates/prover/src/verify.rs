//! Local proof verification.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_snark::SNARK;
use membership_circuits::KnapsackMembershipCircuit;
use thiserror::Error;

use crate::prove::MembershipProof;

/// Errors during verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification failed: {0}")]
    Verification(String),
    #[error("Invalid public inputs: expected {expected} root bits, got {actual}")]
    InvalidInputs { expected: usize, actual: usize },
}

/// Verify a membership proof against a root.
pub fn verify_membership(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    root_bits: &[bool],
) -> Result<bool, VerifyError> {
    let expected = vk.gamma_abc_g1.len().saturating_sub(1);
    if root_bits.len() != expected {
        return Err(VerifyError::InvalidInputs {
            expected,
            actual: root_bits.len(),
        });
    }
    let public_inputs: Vec<Fr> = KnapsackMembershipCircuit::<Fr>::public_inputs(root_bits);

    Groth16::<Bn254>::verify(vk, &public_inputs, proof)
        .map_err(|e| VerifyError::Verification(e.to_string()))
}

/// Verify a proof against the root it was generated for.
pub fn verify_membership_proof(
    vk: &VerifyingKey<Bn254>,
    proof: &MembershipProof,
) -> Result<bool, VerifyError> {
    verify_membership(vk, &proof.proof, &proof.root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prove::prove_membership;
    use crate::setup::setup_membership;
    use ark_std::rand::{rngs::StdRng, Rng, SeedableRng};
    use knapsack_crh::KnapsackParameters;
    use membership_circuits::AuthenticationPath;
    use std::sync::Arc;

    fn proven(depth: usize) -> (VerifyingKey<Bn254>, MembershipProof) {
        let mut rng = StdRng::seed_from_u64(42);
        let params = Arc::new(KnapsackParameters::<Fr>::for_two_to_one(1));
        let keys = setup_membership(&mut rng, params.clone(), depth).unwrap();

        let leaf: Vec<bool> = (0..254).map(|_| rng.gen()).collect();
        let path = AuthenticationPath::random(&mut rng, depth, 254);
        let proof = prove_membership(&keys.proving_key, params, &leaf, &path, &mut rng).unwrap();
        (keys.verifying_key, proof)
    }

    #[test]
    fn test_verify_membership() {
        let (vk, proof) = proven(2);
        assert!(verify_membership_proof(&vk, &proof).unwrap());
    }

    #[test]
    fn test_verify_wrong_root_fails() {
        let (vk, proof) = proven(2);
        let mut root = proof.root.clone();
        root[3] = !root[3];
        assert!(!verify_membership(&vk, &proof.proof, &root).unwrap());
    }

    #[test]
    fn test_verify_rejects_short_root() {
        let (vk, proof) = proven(1);
        assert!(matches!(
            verify_membership(&vk, &proof.proof, &proof.root[..10]),
            Err(VerifyError::InvalidInputs {
                expected: 254,
                actual: 10
            })
        ));
    }
}
