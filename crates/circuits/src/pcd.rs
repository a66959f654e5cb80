//! Inputs of a proof-carrying-data compliance predicate.
//!
//! A compliance predicate checks one step of a distributed computation: the
//! messages a node received, its local data and a witness against the message
//! it sends. The predicate's R1CS sees these as flat field-element vectors:
//!
//! - primary input: the outgoing message, `[type] ‖ payload`
//! - auxiliary input: `[arity]`, every incoming message as above, zero
//!   padding for absent messages up to the maximum arity, the local data,
//!   then the witness
//!
//! Padding keeps the auxiliary layout identical for every arity, so one
//! circuit serves all nodes.

use ark_ff::PrimeField;

use crate::error::PcdError;

/// A message passed along an edge of the computation.
pub trait PcdMessage<F: PrimeField> {
    fn message_type(&self) -> F;

    fn payload_as_field_elements(&self) -> Vec<F>;

    /// `[type] ‖ payload`
    fn as_field_elements(&self) -> Vec<F> {
        let payload = self.payload_as_field_elements();
        let mut elements = Vec::with_capacity(1 + payload.len());
        elements.push(self.message_type());
        elements.extend(payload);
        elements
    }
}

/// Data a node contributes to its compliance check without sending it on.
pub trait PcdLocalData<F: PrimeField> {
    fn as_field_elements(&self) -> Vec<F>;
}

/// A message given directly as field elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMessage<F: PrimeField> {
    pub message_type: F,
    pub payload: Vec<F>,
}

impl<F: PrimeField> RawMessage<F> {
    pub fn new(message_type: F, payload: Vec<F>) -> Self {
        Self {
            message_type,
            payload,
        }
    }
}

impl<F: PrimeField> PcdMessage<F> for RawMessage<F> {
    fn message_type(&self) -> F {
        self.message_type
    }

    fn payload_as_field_elements(&self) -> Vec<F> {
        self.payload.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawLocalData<F: PrimeField> {
    pub elements: Vec<F>,
}

impl<F: PrimeField> RawLocalData<F> {
    pub fn new(elements: Vec<F>) -> Self {
        Self { elements }
    }
}

impl<F: PrimeField> PcdLocalData<F> for RawLocalData<F> {
    fn as_field_elements(&self) -> Vec<F> {
        self.elements.clone()
    }
}

pub struct CompliancePrimaryInput<F: PrimeField> {
    pub outgoing_message: Box<dyn PcdMessage<F>>,
}

impl<F: PrimeField> CompliancePrimaryInput<F> {
    pub fn new(outgoing_message: Box<dyn PcdMessage<F>>) -> Self {
        Self { outgoing_message }
    }

    pub fn as_primary_input(&self) -> Vec<F> {
        self.outgoing_message.as_field_elements()
    }
}

pub struct ComplianceAuxiliaryInput<F: PrimeField> {
    pub incoming_messages: Vec<Box<dyn PcdMessage<F>>>,
    pub local_data: Box<dyn PcdLocalData<F>>,
    pub witness: Vec<F>,
}

impl<F: PrimeField> ComplianceAuxiliaryInput<F> {
    pub fn new(
        incoming_messages: Vec<Box<dyn PcdMessage<F>>>,
        local_data: Box<dyn PcdLocalData<F>>,
        witness: Vec<F>,
    ) -> Self {
        Self {
            incoming_messages,
            local_data,
            witness,
        }
    }

    pub fn arity(&self) -> usize {
        self.incoming_messages.len()
    }

    /// Flatten for a predicate whose `i`-th incoming slot carries a payload of
    /// `payload_lengths[i]` elements. The maximum arity is
    /// `payload_lengths.len()`.
    pub fn as_auxiliary_input(&self, payload_lengths: &[usize]) -> Result<Vec<F>, PcdError> {
        let arity = self.arity();
        let max_arity = payload_lengths.len();
        if arity > max_arity {
            return Err(PcdError::TooManyMessages { arity, max_arity });
        }

        let mut input = vec![F::from(arity as u64)];
        for (index, message) in self.incoming_messages.iter().enumerate() {
            let elements = message.as_field_elements();
            let expected = 1 + payload_lengths[index];
            if elements.len() != expected {
                return Err(PcdError::PayloadLengthMismatch {
                    index,
                    expected,
                    actual: elements.len(),
                });
            }
            input.extend(elements);
        }
        for length in &payload_lengths[arity..] {
            input.extend(std::iter::repeat(F::zero()).take(1 + length));
        }

        input.extend(self.local_data.as_field_elements());
        input.extend_from_slice(&self.witness);
        Ok(input)
    }
}
