//! Merkle-tree membership circuits.
//!
//! This crate provides:
//! - `MembershipGadget`: proves a leaf digest sits at a given address under a root
//! - `DigestSelector`: places a digest into the left or right slot of a hash input
//! - `MembershipCircuit`: root as public input, leaf and address as witnesses
//! - `MerkleTree` / `AuthenticationPath`: native trees and openings
//! - `run_self_test`: end-to-end check on a random opening
//! - `pcd`: input layouts for proof-carrying-data compliance predicates

pub mod circuit;
pub mod error;
pub mod membership;
pub mod path;
pub mod pcd;
pub mod selector;
pub mod tree;


pub use circuit::MembershipCircuit;
pub use error::{MembershipError, PcdError};
pub use membership::{level_to_address_index, LevelFault, MembershipGadget};
pub use path::{AuthenticationPath, AuthenticationPathNode};
pub use selector::DigestSelector;
pub use self_test::{run_self_test, SelfTestReport};
pub use tree::{MerkleTree, MAX_TREE_DEPTH};

use knapsack_crh::KnapsackCrhGadget;

/// Common type aliases
pub type KnapsackMembership<F> = MembershipGadget<F, KnapsackCrhGadget<F>>;
pub type KnapsackMembershipCircuit<F> = MembershipCircuit<F, KnapsackCrhGadget<F>>;
