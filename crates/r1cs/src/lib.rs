//! Rank-1 constraint system substrate.
//!
//! This crate provides:
//! - `ConstraintSystem`: the circuit shape (variables and `A * B = C` constraints)
//! - `Assignment`: concrete values for one execution, stored separately
//! - `BitArray` / `Digest`: fixed-length vectors of boolean variables
//! - `TwoToOneCrhGadget`: the contract a compression-function gadget fulfils
//! - `ArkCircuit`: replays a shape and assignment into `ark-relations`

mod ark;
mod assignment;
mod bits;
mod constraint;
mod error;
mod gadget;

pub use ark::ArkCircuit;
pub use assignment::Assignment;
pub use bits::{BitArray, Digest};
pub use constraint::{
    Constraint, ConstraintStats, ConstraintSystem, LinearCombination, Term, Variable,
};
pub use error::R1csError;
pub use gadget::{OutputAssignment, TwoToOneCrhGadget};
