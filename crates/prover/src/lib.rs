//! Proof generation library for Merkle membership.
//!
//! Wraps `membership-circuits` with Groth16 over BN254:
//! - `setup`: circuit-specific key generation and key persistence
//! - `prove`: proofs that a leaf opens to a root
//! - `verify`: local verification against a root
//! - `config`: command-line configuration for the binaries

pub mod config;
pub mod prove;
pub mod setup;
pub mod verify;

pub use config::{CliConfig, ConfigError, DEFAULT_DEPTH};
pub use prove::{prove_membership, MembershipProof, ProveError};
pub use setup::{
    export_verifying_key_json, load_or_setup, setup_membership, MembershipKeys, SetupError,
};
pub use verify::{verify_membership, verify_membership_proof, VerifyError};
