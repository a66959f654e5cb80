//! Groth16 circuit-specific setup and key persistence.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use knapsack_crh::KnapsackParameters;
use membership_circuits::{KnapsackMembershipCircuit, MembershipError};
use thiserror::Error;

/// Errors during setup or key I/O
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Circuit construction failed: {0}")]
    Circuit(#[from] MembershipError),
    #[error("Setup failed: {0}")]
    Synthesis(String),
    #[error("Key serialization failed: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Keys in {dir:?} take {actual} root bits, the configured hash produces {expected}")]
    KeyMismatch {
        dir: PathBuf,
        expected: usize,
        actual: usize,
    },
}

/// Proving and verifying key for one tree depth.
#[derive(Clone)]
pub struct MembershipKeys {
    pub depth: usize,
    pub proving_key: ProvingKey<Bn254>,
    pub verifying_key: VerifyingKey<Bn254>,
}

/// Run the Groth16 setup for a membership circuit of `depth` levels.
///
/// The keys bind to the circuit shape, which depends on both `depth` and the
/// hash parameters, so proofs must be made with the same `params`.
pub fn setup_membership<R: RngCore + CryptoRng>(
    rng: &mut R,
    params: Arc<KnapsackParameters<Fr>>,
    depth: usize,
) -> Result<MembershipKeys, SetupError> {
    let circuit = KnapsackMembershipCircuit::<Fr>::new(params, depth)?;
    tracing::info!(
        depth,
        constraints = circuit.num_constraints(),
        "running membership setup"
    );

    let (proving_key, verifying_key) =
        Groth16::<Bn254>::circuit_specific_setup(circuit.to_ark_setup(), rng)
            .map_err(|e| SetupError::Synthesis(e.to_string()))?;

    Ok(MembershipKeys {
        depth,
        proving_key,
        verifying_key,
    })
}

impl MembershipKeys {
    fn proving_key_path(dir: &Path, depth: usize) -> PathBuf {
        dir.join(format!("membership_{}.pk", depth))
    }

    fn verifying_key_path(dir: &Path, depth: usize) -> PathBuf {
        dir.join(format!("membership_{}.vk", depth))
    }

    /// Write both keys, compressed, into `dir`.
    pub fn save_to_directory(&self, dir: &Path) -> Result<(), SetupError> {
        fs::create_dir_all(dir)?;

        let mut pk_bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut pk_bytes)
            .map_err(|e| SetupError::Serialization(e.to_string()))?;
        fs::write(Self::proving_key_path(dir, self.depth), pk_bytes)?;

        fs::write(
            Self::verifying_key_path(dir, self.depth),
            verifying_key_bytes(&self.verifying_key)?,
        )?;

        tracing::info!(depth = self.depth, ?dir, "saved membership keys");
        Ok(())
    }

    pub fn load_from_directory(dir: &Path, depth: usize) -> Result<Self, SetupError> {
        let pk_bytes = fs::read(Self::proving_key_path(dir, depth))?;
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(pk_bytes.as_slice())
            .map_err(|e| SetupError::Serialization(e.to_string()))?;

        let vk_bytes = fs::read(Self::verifying_key_path(dir, depth))?;
        let verifying_key = VerifyingKey::<Bn254>::deserialize_compressed(vk_bytes.as_slice())
            .map_err(|e| SetupError::Serialization(e.to_string()))?;

        tracing::debug!(depth, ?dir, "loaded membership keys");
        Ok(Self {
            depth,
            proving_key,
            verifying_key,
        })
    }
}

/// Load the keys for `depth` from `dir`, running the setup only when neither
/// key file exists yet.
///
/// Unreadable, corrupt or mismatched keys are reported and left in place.
pub fn load_or_setup<R: RngCore + CryptoRng>(
    dir: &Path,
    params: Arc<KnapsackParameters<Fr>>,
    depth: usize,
    rng: &mut R,
) -> Result<MembershipKeys, SetupError> {
    let pk_path = MembershipKeys::proving_key_path(dir, depth);
    let vk_path = MembershipKeys::verifying_key_path(dir, depth);
    if !pk_path.exists() && !vk_path.exists() {
        tracing::info!(depth, ?dir, "no keys found, running trusted setup");
        let keys = setup_membership(rng, params, depth)?;
        keys.save_to_directory(dir)?;
        return Ok(keys);
    }

    let keys = MembershipKeys::load_from_directory(dir, depth)?;
    let expected = params.digest_len();
    let actual = keys.verifying_key.gamma_abc_g1.len().saturating_sub(1);
    if actual != expected {
        return Err(SetupError::KeyMismatch {
            dir: dir.to_path_buf(),
            expected,
            actual,
        });
    }
    tracing::info!(depth, ?dir, "loaded existing membership keys");
    Ok(keys)
}

fn verifying_key_bytes(vk: &VerifyingKey<Bn254>) -> Result<Vec<u8>, SetupError> {
    let mut bytes = Vec::new();
    vk.serialize_compressed(&mut bytes)
        .map_err(|e| SetupError::Serialization(e.to_string()))?;
    Ok(bytes)
}

/// The verifying key as JSON, for verifiers outside this workspace.
pub fn export_verifying_key_json(keys: &MembershipKeys, digest_len: usize) -> Result<String, SetupError> {
    let vk = &keys.verifying_key;
    let json = serde_json::json!({
        "circuit": "merkle-membership",
        "depth": keys.depth,
        "digest_len": digest_len,
        "num_public_inputs": vk.gamma_abc_g1.len() - 1,
        "verifying_key": hex::encode(verifying_key_bytes(vk)?),
    });
    serde_json::to_string_pretty(&json).map_err(|e| SetupError::Serialization(e.to_string()))
}
