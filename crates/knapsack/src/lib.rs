//! Knapsack (subset-sum) collision-resistant hash over a prime field.
//!
//! `H(x) = (Σ_j a_{i,j} · x_j)_i` for a bit string `x` and a public key
//! `a`, with each output element re-expanded into its little-endian bits so
//! that digests can be chained as inputs.
//!
//! - `KnapsackParameters`: the sampled key, shared via `Arc`
//! - `KnapsackCrhGadget`: R1CS fragment implementing `TwoToOneCrhGadget`

mod gadget;
mod params;

pub use gadget::KnapsackCrhGadget;
pub use params::{KnapsackParameters, DEFAULT_DIMENSION, DEFAULT_SEED};
