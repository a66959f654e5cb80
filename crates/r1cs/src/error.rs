//! Errors raised while building or witnessing a constraint system.

use thiserror::Error;

use crate::constraint::Variable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum R1csError {
    #[error("no value assigned to {0}")]
    AssignmentMissing(Variable),
    #[error("{0} is not allocated in this constraint system")]
    UnknownVariable(Variable),
    #[error("{0} holds a value other than 0 or 1")]
    NonBoolean(Variable),
    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("hash parameters were sampled for {actual}-bit blocks, but {expected}-bit blocks are required")]
    ParametersMismatch { expected: usize, actual: usize },
}
