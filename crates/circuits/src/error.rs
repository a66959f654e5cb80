//! Errors raised while building or witnessing membership circuits.

use r1cs_core::R1csError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("tree depth must be positive")]
    ZeroDepth,
    #[error("expected {expected} address bits for the tree depth, got {actual}")]
    AddressLengthMismatch { expected: usize, actual: usize },
    #[error("{what} digest has {actual} bits, the hash produces {expected}")]
    DigestLengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("authentication path has {actual} nodes, tree depth is {expected}")]
    PathLengthMismatch { expected: usize, actual: usize },
    #[error("leaf index {index} is outside a tree of {capacity} leaves")]
    IndexOutOfRange { index: u64, capacity: u64 },
    #[error("depth {depth} exceeds the native tree limit of {max}")]
    DepthTooLarge { depth: usize, max: usize },
    #[error(transparent)]
    R1cs(#[from] R1csError),
}

/// Errors raised while flattening PCD compliance-predicate inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PcdError {
    #[error("{arity} incoming messages exceed the maximum arity of {max_arity}")]
    TooManyMessages { arity: usize, max_arity: usize },
    #[error("incoming message {index} flattens to {actual} elements, expected {expected}")]
    PayloadLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
